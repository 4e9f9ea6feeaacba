use chrono::NaiveDate;
use cron_match::{Expression, Result};

#[test]
fn matches() -> Result<()> {
    let expression = Expression::parse("0 0 0 * * *")?;

    let midnight = NaiveDate::from_ymd_opt(2026, 8, 27)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let noon = NaiveDate::from_ymd_opt(2026, 8, 27)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    // Matches every midnight and nothing else
    assert!(expression.matches(&midnight));
    assert!(!expression.matches(&noon));

    Ok(())
}

#[test]
fn describe() -> Result<()> {
    let expression = Expression::parse("0 30 9 ? * MON-FRI")?;
    let description = expression.describe();

    println!("{description}");
    assert!(description.contains("day-of-week"));

    Ok(())
}
