//! Cost-optimisation and benchmark recommendations.
//!
//! Rules run in a fixed order and each fires independently. Cost rules come
//! first (productivity, operating expenses, inventory), then the benchmark
//! comparisons (liquidity, profitability, leverage).

use analysis_core::policy;
use analysis_core::{
    FinancialStatement, Industry, Metric, Priority, Ratio, RatioSet, Recommendation,
    RecommendationCategory,
};
use rust_decimal::prelude::*;
use tracing::debug;

const PRODUCTIVITY_ADVICE: &str =
    "Consider automation or training programs to improve revenue per employee";
const COST_CONTROL_ADVICE: &str =
    "Review and optimize operating expenses - consider renegotiating contracts";
const INVENTORY_ADVICE: &str =
    "Implement just-in-time inventory management to reduce carrying costs";
const LIQUIDITY_ADVICE: &str = "Improve working capital management by optimizing inventory levels and accelerating receivables collection";
const PROFITABILITY_ADVICE: &str =
    "Focus on cost optimization and pricing strategy review to improve profit margins";
const LEVERAGE_ADVICE: &str =
    "Consider debt restructuring or equity financing to improve capital structure";

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(
        &self,
        statement: &FinancialStatement,
        ratios: &RatioSet,
        industry: Industry,
    ) -> Vec<Recommendation> {
        let benchmarks = &industry.profile().benchmarks;
        let mut recommendations = Vec::new();

        // Productivity
        if let (Some(revenue), Some(employees)) = (
            statement.get(Metric::Revenue),
            statement.get(Metric::EmployeeCount),
        ) {
            let per_employee = revenue / employees.max(1.0);
            if per_employee < benchmarks.revenue_per_employee * policy::PRODUCTIVITY_BENCHMARK_SHARE {
                recommendations.push(cost_saving(
                    RecommendationCategory::Productivity,
                    Priority::Medium,
                    PRODUCTIVITY_ADVICE,
                    revenue * policy::PRODUCTIVITY_SAVINGS_RATE,
                    "3-6 months",
                ));
            }
        }

        // Cost control
        if let (Some(opex), Some(revenue)) = (
            statement.get(Metric::OperatingExpenses),
            statement.get(Metric::Revenue),
        ) {
            if revenue <= 0.0 {
                debug!("operating expense ratio skipped: non-positive revenue");
            } else if opex / revenue > policy::OPEX_RATIO_CEILING {
                recommendations.push(cost_saving(
                    RecommendationCategory::CostControl,
                    Priority::High,
                    COST_CONTROL_ADVICE,
                    opex * policy::OPEX_SAVINGS_RATE,
                    "1-3 months",
                ));
            }
        }

        // Inventory turnover
        if let (Some(inventory), Some(cogs)) = (
            statement.get(Metric::Inventory),
            statement.get(Metric::CostOfGoodsSold),
        ) {
            if inventory <= 0.0 {
                debug!("inventory turnover skipped: non-positive inventory");
            } else if cogs / inventory < policy::INVENTORY_TURNOVER_FLOOR {
                recommendations.push(cost_saving(
                    RecommendationCategory::InventoryManagement,
                    Priority::Medium,
                    INVENTORY_ADVICE,
                    inventory * policy::INVENTORY_SAVINGS_RATE,
                    "2-4 months",
                ));
            }
        }

        if ratios
            .get(Ratio::CurrentRatio)
            .is_some_and(|cr| cr < benchmarks.current_ratio)
        {
            recommendations.push(advice(
                RecommendationCategory::Liquidity,
                Priority::High,
                LIQUIDITY_ADVICE,
            ));
        }

        if ratios
            .get(Ratio::ProfitMargin)
            .is_some_and(|pm| pm < benchmarks.profit_margin)
        {
            recommendations.push(advice(
                RecommendationCategory::Profitability,
                Priority::High,
                PROFITABILITY_ADVICE,
            ));
        }

        if ratios
            .get(Ratio::DebtToEquity)
            .is_some_and(|de| de > benchmarks.debt_to_equity)
        {
            recommendations.push(advice(
                RecommendationCategory::Leverage,
                Priority::Medium,
                LEVERAGE_ADVICE,
            ));
        }

        debug!(
            industry = industry.as_str(),
            count = recommendations.len(),
            "recommendations generated"
        );

        recommendations
    }
}

fn cost_saving(
    category: RecommendationCategory,
    priority: Priority,
    text: &str,
    savings: f64,
    timeline: &str,
) -> Recommendation {
    Recommendation {
        category,
        priority,
        recommendation: text.to_string(),
        potential_savings: Decimal::from_f64(savings).map(|d| d.round_dp(2)),
        implementation_time: Some(timeline.to_string()),
    }
}

fn advice(category: RecommendationCategory, priority: Priority, text: &str) -> Recommendation {
    Recommendation {
        category,
        priority,
        recommendation: text.to_string(),
        potential_savings: None,
        implementation_time: None,
    }
}
