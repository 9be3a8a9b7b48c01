use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOME_OWNERSHIP_OPTIONS: &[&str] = &["OWN", "MORTGAGE", "RENT", "OTHER"];
pub const LOAN_INTENT_OPTIONS: &[&str] = &[
    "DEBTCONSOLIDATION",
    "HOMEIMPROVEMENT",
    "EDUCATION",
    "MEDICAL",
    "PERSONAL",
    "VENTURE",
];
pub const LOAN_GRADE_OPTIONS: &[&str] = &["A", "B", "C", "D", "E", "F", "G"];
pub const DEFAULT_ON_FILE_OPTIONS: &[&str] = &["N", "Y"];

/// Applicant and loan attributes collected by the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PersonAge,
    PersonIncome,
    PersonEmpLength,
    LoanAmnt,
    LoanIntRate,
    LoanPercentIncome,
    CbPersonCredHistLength,
    PersonHomeOwnership,
    LoanIntent,
    LoanGrade,
    CbPersonDefaultOnFile,
}

/// Input constraint attached to a field, mirroring what a native input widget enforces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Numeric { min: f64, max: f64 },
    Categorical { options: &'static [&'static str] },
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::PersonAge,
        Field::PersonIncome,
        Field::PersonEmpLength,
        Field::LoanAmnt,
        Field::LoanIntRate,
        Field::LoanPercentIncome,
        Field::CbPersonCredHistLength,
        Field::PersonHomeOwnership,
        Field::LoanIntent,
        Field::LoanGrade,
        Field::CbPersonDefaultOnFile,
    ];

    /// Fields the controller converts from text to numbers before submission.
    pub const NUMERIC: [Field; 7] = [
        Field::PersonAge,
        Field::PersonIncome,
        Field::PersonEmpLength,
        Field::LoanAmnt,
        Field::LoanIntRate,
        Field::LoanPercentIncome,
        Field::CbPersonCredHistLength,
    ];

    /// Wire name used by the prediction service.
    pub fn name(self) -> &'static str {
        match self {
            Field::PersonAge => "person_age",
            Field::PersonIncome => "person_income",
            Field::PersonEmpLength => "person_emp_length",
            Field::LoanAmnt => "loan_amnt",
            Field::LoanIntRate => "loan_int_rate",
            Field::LoanPercentIncome => "loan_percent_income",
            Field::CbPersonCredHistLength => "cb_person_cred_hist_length",
            Field::PersonHomeOwnership => "person_home_ownership",
            Field::LoanIntent => "loan_intent",
            Field::LoanGrade => "loan_grade",
            Field::CbPersonDefaultOnFile => "cb_person_default_on_file",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::PersonAge => "Age (years)",
            Field::PersonIncome => "Annual Income ($)",
            Field::PersonEmpLength => "Employment Length (years)",
            Field::LoanAmnt => "Loan Amount ($)",
            Field::LoanIntRate => "Interest Rate (%)",
            Field::LoanPercentIncome => "Loan Payment / Income",
            Field::CbPersonCredHistLength => "Credit History Length (years)",
            Field::PersonHomeOwnership => "Home Ownership",
            Field::LoanIntent => "Loan Intent",
            Field::LoanGrade => "Loan Grade",
            Field::CbPersonDefaultOnFile => "Default on File",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::PersonAge => FieldKind::Numeric {
                min: 18.0,
                max: 100.0,
            },
            Field::PersonIncome => FieldKind::Numeric {
                min: 0.0,
                max: 1_000_000.0,
            },
            Field::PersonEmpLength => FieldKind::Numeric {
                min: 0.0,
                max: 60.0,
            },
            Field::LoanAmnt => FieldKind::Numeric {
                min: 500.0,
                max: 1_000_000.0,
            },
            Field::LoanIntRate => FieldKind::Numeric {
                min: 1.0,
                max: 60.0,
            },
            Field::LoanPercentIncome => FieldKind::Numeric { min: 0.0, max: 1.0 },
            Field::CbPersonCredHistLength => FieldKind::Numeric {
                min: 0.0,
                max: 60.0,
            },
            Field::PersonHomeOwnership => FieldKind::Categorical {
                options: HOME_OWNERSHIP_OPTIONS,
            },
            Field::LoanIntent => FieldKind::Categorical {
                options: LOAN_INTENT_OPTIONS,
            },
            Field::LoanGrade => FieldKind::Categorical {
                options: LOAN_GRADE_OPTIONS,
            },
            Field::CbPersonDefaultOnFile => FieldKind::Categorical {
                options: DEFAULT_ON_FILE_OPTIONS,
            },
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self.kind(), FieldKind::Numeric { .. })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name.trim())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
