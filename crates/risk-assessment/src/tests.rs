#[cfg(test)]
mod risk_assessor_tests {
    use crate::{risk_grade, RiskAssessor, SampledSignal};
    use analysis_core::policy::{self, INDUSTRY_RISK};
    use analysis_core::{
        FinancialStatement, Grade, Industry, IndustryRiskSignal, Metric, RiskFactor, Severity,
    };
    use approx::assert_relative_eq;

    /// Statement whose ratios land on the given values.
    fn statement(current_ratio: f64, debt_to_equity: f64, profit_margin: f64) -> FinancialStatement {
        FinancialStatement::new()
            .with(Metric::CurrentAssets, current_ratio * 100_000.0)
            .with(Metric::CurrentLiabilities, 100_000.0)
            .with(Metric::TotalDebt, debt_to_equity * 500_000.0)
            .with(Metric::TotalEquity, 500_000.0)
            .with(Metric::NetIncome, profit_margin * 1_000_000.0)
            .with(Metric::Revenue, 1_000_000.0)
    }

    struct FixedSignal(f64);

    impl IndustryRiskSignal for FixedSignal {
        fn intensity(&self, _factor: RiskFactor, _statement: &FinancialStatement) -> f64 {
            self.0
        }
    }

    #[test]
    fn liquidity_classification() {
        let assessor = RiskAssessor::new();
        let cases = [(0.9, Severity::High), (1.2, Severity::Medium), (2.0, Severity::Low)];

        for (current_ratio, expected) in cases {
            let profile = assessor.assess(&statement(current_ratio, 0.5, 0.1), Industry::Services);
            assert_eq!(profile.severity("liquidity_risk"), Some(expected), "cr={}", current_ratio);
        }
    }

    #[test]
    fn credit_and_operational_classification() {
        let assessor = RiskAssessor::new();

        let profile = assessor.assess(&statement(2.0, 2.5, -0.1), Industry::Services);
        assert_eq!(profile.severity("credit_risk"), Some(Severity::High));
        assert_eq!(profile.severity("operational_risk"), Some(Severity::High));

        let profile = assessor.assess(&statement(2.0, 1.5, 0.03), Industry::Services);
        assert_eq!(profile.severity("credit_risk"), Some(Severity::Medium));
        assert_eq!(profile.severity("operational_risk"), Some(Severity::Medium));
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(risk_grade(20.0), Grade::A);
        assert_eq!(risk_grade(21.0), Grade::B);
        assert_eq!(risk_grade(40.0), Grade::B);
        assert_eq!(risk_grade(41.0), Grade::C);
        assert_eq!(risk_grade(60.0), Grade::C);
        assert_eq!(risk_grade(61.0), Grade::D);
    }

    #[test]
    fn healthy_business_scores_low_risk() {
        // 5 + 3 + 2 + midpoint industry term (0.45 * 1.0 * 20 = 9)
        let profile = RiskAssessor::new().assess(&statement(2.0, 0.5, 0.1), Industry::Manufacturing);

        assert_relative_eq!(profile.overall_risk_score, 19.0, epsilon = 1e-9);
        assert_eq!(profile.risk_grade, Grade::A);
        assert_eq!(profile.severity("supply_chain_risk"), Some(Severity::Low));
        assert!(profile.unassessed.is_empty());
    }

    #[test]
    fn distressed_business_scores_high_risk() {
        // 30 + 25 + 20 + 20 (full intensity)
        let assessor = RiskAssessor::new().with_signal(Box::new(FixedSignal(1.0)));
        let profile = assessor.assess(&statement(0.5, 3.0, -0.2), Industry::Retail);

        assert_relative_eq!(profile.overall_risk_score, 95.0, epsilon = 1e-9);
        assert_eq!(profile.risk_grade, Grade::D);
        assert_eq!(
            profile.high_risks(),
            vec!["credit_risk", "liquidity_risk", "operational_risk"]
        );
    }

    #[test]
    fn industry_risk_band_boundary() {
        assert_eq!(policy::classify(0.0, INDUSTRY_RISK), Some(Severity::Low));
        assert_eq!(policy::classify(10.0, INDUSTRY_RISK), Some(Severity::Low));
        assert_eq!(policy::classify(10.01, INDUSTRY_RISK), Some(Severity::Medium));
        assert_eq!(policy::classify(20.0, INDUSTRY_RISK), Some(Severity::Medium));
    }

    #[test]
    fn industry_factor_stays_low_at_full_intensity() {
        // heaviest weight is 0.4, so 0.4 * 20 = 8 never crosses 10
        let assessor = RiskAssessor::new().with_signal(Box::new(FixedSignal(1.0)));
        let profile = assessor.assess(&statement(2.0, 0.5, 0.1), Industry::Logistics);
        assert_eq!(profile.severity("competition_risk"), Some(Severity::Low));
        assert_eq!(profile.severity("fuel_risk"), Some(Severity::Low));
    }

    #[test]
    fn missing_ratios_are_unassessed() {
        let statement = FinancialStatement::new().with(Metric::Revenue, 1_000_000.0);
        let profile = RiskAssessor::new().assess(&statement, Industry::Services);

        assert_eq!(
            profile.unassessed,
            vec!["liquidity_risk", "credit_risk", "operational_risk"]
        );
        assert_eq!(profile.severity("liquidity_risk"), None);
        assert_relative_eq!(profile.overall_risk_score, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn undefined_ratio_is_unassessed() {
        let statement = statement(2.0, 0.5, 0.1).with(Metric::TotalEquity, 0.0);
        let profile = RiskAssessor::new().assess(&statement, Industry::Services);
        assert!(profile.unassessed.contains(&"credit_risk".to_string()));
    }

    #[test]
    fn unknown_industry_uses_services_weights() {
        let assessor = RiskAssessor::new();
        let s = statement(1.2, 1.2, 0.04);

        let resolved = assessor.assess(&s, Industry::resolve(Some("space mining")));
        let services = assessor.assess(&s, Industry::Services);
        assert_eq!(resolved, services);
        assert!(resolved.risks.contains_key("client_concentration_risk"));
    }

    #[test]
    fn deterministic_signal_is_idempotent() {
        let assessor = RiskAssessor::new();
        let s = statement(1.4, 1.8, 0.02);
        assert_eq!(assessor.assess(&s, Industry::Agriculture), assessor.assess(&s, Industry::Agriculture));
    }

    #[test]
    fn seeded_sample_is_reproducible_and_in_range() {
        let signal = SampledSignal { seed: Some(42) };
        let s = FinancialStatement::new();

        let first = signal.intensity(RiskFactor::Weather, &s);
        assert_eq!(first, signal.intensity(RiskFactor::Weather, &s));
        assert!((0.1..0.8).contains(&first));

        let unseeded = SampledSignal::default().intensity(RiskFactor::Fuel, &s);
        assert!((0.1..0.8).contains(&unseeded));
    }

    #[test]
    fn signal_intensity_is_clamped() {
        let distressed = statement(0.5, 3.0, -0.2);
        let assess = |intensity: f64| {
            RiskAssessor::new()
                .with_signal(Box::new(FixedSignal(intensity)))
                .assess(&distressed, Industry::Retail)
        };

        let saturated = assess(50.0);
        assert_eq!(saturated, assess(1.0));
        // 30 + 25 + 20 from the core categories, 20 from the industry factors
        assert_relative_eq!(saturated.overall_risk_score, 95.0, epsilon = 1e-9);
        assert_eq!(saturated.risk_grade, Grade::D);

        assert_eq!(assess(-3.0), assess(0.0));
        assert_relative_eq!(assess(-3.0).overall_risk_score, 75.0, epsilon = 1e-9);
    }
}

#[cfg(test)]
mod credit_assessor_tests {
    use crate::CreditAssessor;
    use analysis_core::{FinancialStatement, Grade, Metric, Ratio, RatioSet, RiskLevel};
    use approx::assert_relative_eq;

    #[test]
    fn strong_business_keeps_full_score() {
        let ratios = RatioSet::new()
            .with(Ratio::CurrentRatio, 1.8)
            .with(Ratio::DebtToEquity, 0.6)
            .with(Ratio::ProfitMargin, 0.12);
        let statement = FinancialStatement::new().with(Metric::OperatingCashFlow, 120_000.0);

        let credit = CreditAssessor::new().assess(&statement, &ratios);
        assert_relative_eq!(credit.score, 100.0);
        assert_eq!(credit.grade, Grade::A);
        assert_eq!(credit.risk_level, RiskLevel::Low);
        assert!(credit.risk_factors.is_empty());
    }

    #[test]
    fn weak_business_accumulates_factors() {
        let ratios = RatioSet::new()
            .with(Ratio::CurrentRatio, 0.8)
            .with(Ratio::DebtToEquity, 1.4)
            .with(Ratio::ProfitMargin, -0.05);
        let statement = FinancialStatement::new().with(Metric::OperatingCashFlow, -10_000.0);

        let credit = CreditAssessor::new().assess(&statement, &ratios);
        // 100 - 20 - 15 - 25 - 20
        assert_relative_eq!(credit.score, 20.0);
        assert_eq!(credit.grade, Grade::D);
        assert_eq!(credit.risk_level, RiskLevel::High);
        assert_eq!(
            credit.risk_factors,
            vec![
                "Low liquidity - current ratio below 1.0",
                "High debt burden",
                "Negative profit margins",
                "Negative operating cash flow",
            ]
        );
    }

    #[test]
    fn moderate_concerns() {
        let ratios = RatioSet::new()
            .with(Ratio::CurrentRatio, 1.1)
            .with(Ratio::ProfitMargin, 0.03);

        let credit = CreditAssessor::new().assess(&FinancialStatement::new(), &ratios);
        assert_relative_eq!(credit.score, 80.0);
        assert_eq!(credit.grade, Grade::A);
        assert_eq!(credit.risk_factors, vec!["Moderate liquidity concern", "Low profit margins"]);
    }
}
