//! Yearly footprint from daily, monthly and weekly habits

use crate::factors::EmissionFactors;
use serde::{Deserialize, Serialize};
use std::fmt;

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const WEEKS_PER_YEAR: f64 = 52.0;
const KG_PER_TONNE: f64 = 1000.0;

/// Raw habits, each in its natural period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbonInputs {
    pub distance_km_per_day: f64,
    pub electricity_kwh_per_month: f64,
    pub waste_kg_per_week: f64,
    pub meals_per_day: f64,
}

impl CarbonInputs {
    pub fn new(distance: f64, electricity: f64, waste: f64, meals: f64) -> Self {
        Self {
            distance_km_per_day: sanitize(distance),
            electricity_kwh_per_month: sanitize(electricity),
            waste_kg_per_week: sanitize(waste),
            meals_per_day: sanitize(meals),
        }
    }

    /// Build from form fields; anything that isn't a non-negative number
    /// counts as zero
    pub fn from_fields(distance: &str, electricity: &str, waste: &str, meals: &str) -> Self {
        Self::new(
            parse_lenient(distance),
            parse_lenient(electricity),
            parse_lenient(waste),
            parse_lenient(meals),
        )
    }
}

/// Leading numeric prefix of `field`, or 0
fn parse_lenient(field: &str) -> f64 {
    let field = field.trim();
    let parsed = (1..=field.len())
        .rev()
        .filter(|&end| field.is_char_boundary(end))
        .find_map(|end| field[..end].parse::<f64>().ok());
    match parsed {
        Some(value) => sanitize(value),
        None => {
            if !field.is_empty() {
                log::debug!("Treating non-numeric input {:?} as 0", field);
            }
            0.0
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Transportation,
    Electricity,
    Diet,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Transportation,
        Category::Electricity,
        Category::Diet,
        Category::Waste,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Transportation => "Transportation",
            Category::Electricity => "Electricity",
            Category::Diet => "Diet",
            Category::Waste => "Waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tonnes of CO2 per year, by category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonReport {
    pub transportation: f64,
    pub electricity: f64,
    pub diet: f64,
    pub waste: f64,
    pub total: f64,
}

impl CarbonReport {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Transportation => self.transportation,
            Category::Electricity => self.electricity,
            Category::Diet => self.diet,
            Category::Waste => self.waste,
        }
    }

    /// The biggest contributor; `None` when everything is zero
    pub fn largest_category(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.get(*c) > 0.0)
            .fold(None, |best: Option<Category>, c| match best {
                Some(b) if self.get(b) >= self.get(c) => Some(b),
                _ => Some(c),
            })
    }
}

impl fmt::Display for CarbonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in Category::ALL {
            writeln!(
                f,
                "{:<15} {:.2} tonnes CO2/year",
                format!("{}:", category),
                self.get(category)
            )?;
        }
        write!(f, "{:<15} {:.2} tonnes CO2/year", "Total:", self.total)
    }
}

pub fn calculate(inputs: &CarbonInputs, factors: &EmissionFactors) -> CarbonReport {
    let yearly_distance = inputs.distance_km_per_day * DAYS_PER_YEAR;
    let yearly_electricity = inputs.electricity_kwh_per_month * MONTHS_PER_YEAR;
    let yearly_waste = inputs.waste_kg_per_week * WEEKS_PER_YEAR;
    let yearly_meals = inputs.meals_per_day * DAYS_PER_YEAR;

    let transportation = factors.transportation * yearly_distance / KG_PER_TONNE;
    let electricity = factors.electricity * yearly_electricity / KG_PER_TONNE;
    let diet = factors.diet * yearly_meals / KG_PER_TONNE;
    let waste = factors.waste * yearly_waste / KG_PER_TONNE;

    CarbonReport {
        transportation,
        electricity,
        diet,
        waste,
        total: transportation + electricity + diet + waste,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_household() {
        let inputs = CarbonInputs::new(10.0, 100.0, 5.0, 3.0);
        let report = calculate(&inputs, &EmissionFactors::default());

        assert!(close(report.transportation, 0.511));
        assert!(close(report.electricity, 0.984));
        assert!(close(report.diet, 1.36875));
        assert!(close(report.waste, 0.026));
        assert!(close(report.total, 2.88975));
        assert_eq!(format!("{:.2}", report.total), "2.89");
    }

    #[test]
    fn identical_inputs_give_identical_reports() {
        let inputs = CarbonInputs::new(10.0, 100.0, 5.0, 3.0);
        let factors = EmissionFactors::default();
        assert_eq!(calculate(&inputs, &factors), calculate(&inputs, &factors));
    }

    #[test]
    fn non_numeric_fields_are_zero() {
        let inputs = CarbonInputs::from_fields("abc", "", "-4", "3");
        assert_eq!(inputs.distance_km_per_day, 0.0);
        assert_eq!(inputs.electricity_kwh_per_month, 0.0);
        assert_eq!(inputs.waste_kg_per_week, 0.0);
        assert_eq!(inputs.meals_per_day, 3.0);
    }

    #[test]
    fn numeric_prefix_is_kept() {
        let inputs = CarbonInputs::from_fields("12.5km", " 100 ", "5kg", "NaN");
        assert_eq!(inputs.distance_km_per_day, 12.5);
        assert_eq!(inputs.electricity_kwh_per_month, 100.0);
        assert_eq!(inputs.waste_kg_per_week, 5.0);
        assert_eq!(inputs.meals_per_day, 0.0);
    }

    #[test]
    fn zero_inputs_have_no_largest_category() {
        let report = calculate(&CarbonInputs::default(), &EmissionFactors::default());
        assert_eq!(report.total, 0.0);
        assert_eq!(report.largest_category(), None);
    }

    #[test]
    fn diet_dominates_reference_household() {
        let report = calculate(
            &CarbonInputs::new(10.0, 100.0, 5.0, 3.0),
            &EmissionFactors::default(),
        );
        assert_eq!(report.largest_category(), Some(Category::Diet));
    }

    #[test]
    fn display_uses_two_decimals() {
        let report = calculate(
            &CarbonInputs::new(10.0, 100.0, 5.0, 3.0),
            &EmissionFactors::default(),
        );
        let text = report.to_string();
        assert!(text.contains("Transportation: 0.51 tonnes CO2/year"));
        assert!(text.contains("Diet:"));
        assert!(text.ends_with("Total:          2.89 tonnes CO2/year"));
    }

    #[test]
    fn report_serializes_by_category() {
        let report = calculate(&CarbonInputs::new(0.0, 0.0, 0.0, 1.0), &EmissionFactors::default());
        let json = serde_json::to_value(report).unwrap();
        assert!(close(json["diet"].as_f64().unwrap(), 0.45625));
    }
}
