//! Personal carbon calculator

use super::prompt;
use anyhow::Result;
use butterfly_carbon::{calculate, CarbonInputs, CarbonReport, EmissionFactors, Region};
use std::io::{self, BufRead, Write};

pub struct CarbonArgs {
    pub distance: Option<String>,
    pub electricity: Option<String>,
    pub waste: Option<String>,
    pub meals: Option<String>,
    pub json: bool,
}

impl CarbonArgs {
    fn is_empty(&self) -> bool {
        self.distance.is_none()
            && self.electricity.is_none()
            && self.waste.is_none()
            && self.meals.is_none()
    }

    fn inputs(&self) -> CarbonInputs {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        CarbonInputs::from_fields(
            &field(&self.distance),
            &field(&self.electricity),
            &field(&self.waste),
            &field(&self.meals),
        )
    }
}

pub fn run(args: CarbonArgs) -> Result<()> {
    if args.is_empty() && !args.json {
        return interactive();
    }
    let report = estimate(&args.inputs());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&mut io::stdout().lock(), &report)?;
    }
    Ok(())
}

/// Ask for each habit in turn
pub fn interactive() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    let inputs = ask(&mut input, &mut out)?;
    print_report(&mut out, &estimate(&inputs))
}

fn estimate(inputs: &CarbonInputs) -> CarbonReport {
    let region = Region::default();
    log::debug!("Estimating footprint for {} with {:?}", region, inputs);
    calculate(inputs, &EmissionFactors::for_region(region))
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<CarbonInputs> {
    writeln!(out, "Personal Carbon Calculator")?;
    let mut fields = Vec::with_capacity(4);
    for question in [
        "Daily commute distance (km): ",
        "Monthly electricity consumption (kWh): ",
        "Waste generated per week (kg): ",
        "Number of meals per day: ",
    ] {
        fields.push(prompt(input, out, question)?.unwrap_or_default());
    }
    Ok(CarbonInputs::from_fields(
        &fields[0], &fields[1], &fields[2], &fields[3],
    ))
}

fn print_report<W: Write>(out: &mut W, report: &CarbonReport) -> Result<()> {
    writeln!(out, "Carbon Emissions by Category")?;
    writeln!(out, "{}", report)?;
    if let Some(category) = report.largest_category() {
        writeln!(out, "Largest source: {}", category)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn interactive_fields_feed_the_calculation() {
        let mut out = Vec::new();
        let inputs = ask(&mut Cursor::new("10\n100\n5\n3\n"), &mut out).unwrap();
        assert_eq!(inputs, CarbonInputs::new(10.0, 100.0, 5.0, 3.0));

        let mut report_text = Vec::new();
        print_report(&mut report_text, &estimate(&inputs)).unwrap();
        let text = String::from_utf8(report_text).unwrap();
        assert!(text.contains("Total:          2.89 tonnes CO2/year"));
        assert!(text.contains("Largest source: Diet"));
    }

    #[test]
    fn omitted_flags_count_as_zero() {
        let args = CarbonArgs {
            distance: Some("10".into()),
            electricity: None,
            waste: Some("abc".into()),
            meals: None,
            json: true,
        };
        assert!(!args.is_empty());
        assert_eq!(args.inputs(), CarbonInputs::new(10.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn missing_fields_count_as_zero() {
        let inputs = ask(&mut Cursor::new("7\n"), &mut Vec::new()).unwrap();
        assert_eq!(inputs, CarbonInputs::new(7.0, 0.0, 0.0, 0.0));
    }
}
