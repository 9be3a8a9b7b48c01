use super::{ApplicationRecord, Field};

/// The low-risk reference applicant, fully populated.
pub(crate) fn complete_record() -> ApplicationRecord {
    let mut record = ApplicationRecord::new();
    record.set(Field::PersonAge, "35");
    record.set(Field::PersonIncome, "85000");
    record.set(Field::PersonEmpLength, "8.5");
    record.set(Field::LoanAmnt, "10000");
    record.set(Field::LoanIntRate, "11.0");
    record.set(Field::LoanPercentIncome, "0.15");
    record.set(Field::CbPersonCredHistLength, "10");
    record.set(Field::PersonHomeOwnership, "OWN");
    record.set(Field::LoanIntent, "DEBTCONSOLIDATION");
    record.set(Field::LoanGrade, "A");
    record.set(Field::CbPersonDefaultOnFile, "N");
    record
}
