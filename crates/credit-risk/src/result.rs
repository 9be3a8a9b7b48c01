//! Risk card rendering for a returned prediction.

use chrono::{DateTime, Local};

use crate::service::{FactorContribution, PredictionResult};

pub const MAX_FACTORS: usize = 5;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Indicator bucket chosen from the risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Anything other than the two known labels is shown as high risk.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Low Risk" => RiskLevel::Low,
            "Medium Risk" => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            RiskLevel::Low => "[OK]",
            RiskLevel::Medium => "[!]",
            RiskLevel::High => "[!!]",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            RiskLevel::Low => GREEN,
            RiskLevel::Medium => AMBER,
            RiskLevel::High => RED,
        }
    }
}

/// Direction a factor pushes the predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorTone {
    RaisesRisk,
    LowersRisk,
}

impl FactorTone {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            FactorTone::RaisesRisk
        } else {
            FactorTone::LowersRisk
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            FactorTone::RaisesRisk => RED,
            FactorTone::LowersRisk => GREEN,
        }
    }
}

/// One rendered factor line.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorLine {
    pub feature: String,
    pub value_text: String,
    pub tone: FactorTone,
}

impl FactorLine {
    fn from_contribution(contribution: &FactorContribution) -> Self {
        let value = contribution.shap_value;
        let sign = if value > 0.0 { "+" } else { "" };
        Self {
            feature: contribution.feature.clone(),
            value_text: format!("{sign}{value:.4}"),
            tone: FactorTone::of(value),
        }
    }
}

/// What the user asked for on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Reset,
    Quit,
}

impl ResultAction {
    /// `q` quits; any other answer, including a bare Enter, goes back to the form.
    pub fn from_input(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("q") {
            ResultAction::Quit
        } else {
            ResultAction::Reset
        }
    }
}

/// Read-only view over a prediction. Performs no I/O beyond formatting.
#[derive(Debug, Clone)]
pub struct ResultView<'a> {
    result: &'a PredictionResult,
    assessed_at: DateTime<Local>,
    color: bool,
}

impl<'a> ResultView<'a> {
    pub fn new(result: &'a PredictionResult) -> Self {
        Self {
            result,
            assessed_at: Local::now(),
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn assessed_at(mut self, at: DateTime<Local>) -> Self {
        self.assessed_at = at;
        self
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_label(&self.result.risk_label)
    }

    pub fn probability_text(&self) -> String {
        percent(self.result.probability)
    }

    /// The first five factors, in the order the service returned them.
    pub fn factor_lines(&self) -> Vec<FactorLine> {
        self.result
            .shap_values
            .iter()
            .take(MAX_FACTORS)
            .map(FactorLine::from_contribution)
            .collect()
    }

    /// Escape sequence for the label: the service's `risk_color`, or the level's own
    /// color when that is not a `#rrggbb` value.
    fn label_color(&self) -> String {
        truecolor(&self.result.risk_color).unwrap_or_else(|| self.level().ansi().to_string())
    }

    fn model_metadata(&self) -> Option<String> {
        let base = self
            .result
            .base_value
            .map(|base| format!("Base value (expected prob): {}", percent(base)));
        let predicted = self
            .result
            .prediction_probability
            .map(|predicted| format!("Predicted prob: {}", percent(predicted)));

        match (base, predicted) {
            (Some(base), Some(predicted)) => Some(format!("{base} | {predicted}")),
            (base, predicted) => base.or(predicted),
        }
    }

    pub fn render(&self) -> String {
        let label_color = self.label_color();
        let mut lines = vec![
            format!(
                "{} Risk: {}",
                self.level().icon(),
                self.paint(&self.result.risk_label, &[BOLD, label_color.as_str()])
            ),
            format!("Probability of Risk: {}", self.probability_text()),
        ];
        if let Some(class) = self.result.prediction {
            lines.push(format!("Predicted class (1=risk, 0=non-risk): {class}"));
        }
        lines.extend(self.model_metadata());
        lines.push(format!(
            "Assessed at: {}",
            self.assessed_at.format("%Y-%m-%d %H:%M:%S")
        ));

        let factors = self.factor_lines();
        if !factors.is_empty() {
            lines.push(String::new());
            lines.push("Top contributing factors (positive increases risk):".to_string());
            let width = factors
                .iter()
                .map(|line| line.feature.len())
                .max()
                .unwrap_or(0);
            lines.extend(factors.iter().map(|line| {
                format!(
                    "  {:<width$}  {}",
                    line.feature,
                    self.paint(&line.value_text, &[line.tone.ansi()])
                )
            }));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn paint(&self, text: &str, codes: &[&str]) -> String {
        if self.color {
            format!("{}{text}{RESET}", codes.concat())
        } else {
            text.to_string()
        }
    }
}

/// 24-bit foreground escape for a `#rrggbb` color.
fn truecolor(hex: &str) -> Option<String> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    let (red, green, blue) = (channel(0)?, channel(2)?, channel(4)?);
    Some(format!("\x1b[38;2;{red};{green};{blue}m"))
}

fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(label: &str, probability: f64, factors: &[(&str, f64)]) -> PredictionResult {
        PredictionResult {
            risk_label: label.to_string(),
            risk_color: "#2e7d32".to_string(),
            probability,
            shap_values: factors
                .iter()
                .map(|(feature, shap_value)| FactorContribution {
                    feature: feature.to_string(),
                    shap_value: *shap_value,
                })
                .collect(),
            prediction: None,
            base_value: None,
            prediction_probability: None,
        }
    }

    #[test]
    fn low_risk_scenario_renders_expected_values() {
        let result = result_with(
            "Low Risk",
            0.0421,
            &[("loan_int_rate", -0.12), ("person_income", 0.031)],
        );
        let view = ResultView::new(&result);

        assert_eq!(view.level(), RiskLevel::Low);
        assert_eq!(view.probability_text(), "4.21%");

        let lines = view.factor_lines();
        assert_eq!(lines[0].feature, "loan_int_rate");
        assert_eq!(lines[0].value_text, "-0.1200");
        assert_eq!(lines[0].tone, FactorTone::LowersRisk);
        assert_eq!(lines[1].value_text, "+0.0310");
        assert_eq!(lines[1].tone, FactorTone::RaisesRisk);

        let rendered = view.render();
        assert!(rendered.contains("Low Risk"));
        assert!(rendered.contains("4.21%"));
        assert!(rendered.contains(&format!("{GREEN}-0.1200{RESET}")));
    }

    #[test]
    fn label_fallback_is_three_way() {
        assert_eq!(RiskLevel::from_label("Low Risk"), RiskLevel::Low);
        assert_eq!(RiskLevel::from_label("Medium Risk"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label("High Risk"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("Unknown"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("low risk"), RiskLevel::High);
    }

    #[test]
    fn shows_at_most_five_factors_in_order() {
        let factors: Vec<(String, f64)> = (0..8)
            .map(|idx| (format!("feature_{idx}"), idx as f64 / 10.0))
            .collect();
        let borrowed: Vec<(&str, f64)> = factors
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        let result = result_with("High Risk", 0.73, &borrowed);

        let lines = ResultView::new(&result).factor_lines();
        let names: Vec<&str> = lines.iter().map(|line| line.feature.as_str()).collect();
        assert_eq!(
            names,
            vec!["feature_0", "feature_1", "feature_2", "feature_3", "feature_4"]
        );
        assert_eq!(lines[0].tone, FactorTone::LowersRisk, "zero is non-positive");
    }

    #[test]
    fn plain_render_includes_optional_metadata() {
        let mut result = result_with("Medium Risk", 0.35, &[]);
        result.prediction = Some(0);
        result.base_value = Some(0.1834);
        result.prediction_probability = Some(0.35);

        let rendered = ResultView::new(&result).with_color(false).render();
        assert!(rendered.starts_with("[!] Risk: Medium Risk\n"));
        assert!(rendered.contains("Probability of Risk: 35.00%\n"));
        assert!(rendered.contains("Predicted class (1=risk, 0=non-risk): 0\n"));
        assert!(rendered.contains("Base value (expected prob): 18.34% | Predicted prob: 35.00%\n"));
        assert!(rendered.ends_with('\n'));
        assert!(!rendered.contains("Top contributing factors"));
        assert!(!rendered.contains('\x1b'));
    }

    #[test]
    fn metadata_lines_are_omitted_when_absent() {
        let result = result_with("Low Risk", 0.1, &[]);
        let rendered = ResultView::new(&result).with_color(false).render();
        assert!(!rendered.contains("Base value"));
        assert!(!rendered.contains("Predicted prob"));

        let mut predicted_only = result_with("Low Risk", 0.1, &[]);
        predicted_only.prediction_probability = Some(0.0421);
        let rendered = ResultView::new(&predicted_only).with_color(false).render();
        assert!(rendered.contains("\nPredicted prob: 4.21%\n"));
        assert!(!rendered.contains("Base value"));
    }

    #[test]
    fn label_takes_the_service_color() {
        let result = result_with("Low Risk", 0.0421, &[]);
        let rendered = ResultView::new(&result).render();
        assert!(rendered.starts_with(&format!(
            "[OK] Risk: {BOLD}\x1b[38;2;46;125;50mLow Risk{RESET}\n"
        )));
    }

    #[test]
    fn unparseable_service_color_falls_back_to_level_color() {
        for color in ["", "red", "#2e7d3", "#zz7d32", "2e7d32"] {
            let mut result = result_with("High Risk", 0.81, &[]);
            result.risk_color = color.to_string();
            let rendered = ResultView::new(&result).render();
            assert!(
                rendered.starts_with(&format!("[!!] Risk: {BOLD}{RED}High Risk{RESET}")),
                "color {color:?} rendered {rendered:?}"
            );
        }
    }

    #[test]
    fn only_q_quits_the_result_screen() {
        assert_eq!(ResultAction::from_input("q"), ResultAction::Quit);
        assert_eq!(ResultAction::from_input(" Q "), ResultAction::Quit);
        assert_eq!(ResultAction::from_input(""), ResultAction::Reset);
        assert_eq!(ResultAction::from_input("quit now"), ResultAction::Reset);
    }
}
