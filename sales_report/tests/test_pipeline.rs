use approx::assert_relative_eq;
use chrono::NaiveDate;
use rstest::rstest;
use sales_report::config::ForecastSettings;
use sales_report::data::SalesRecord;
use sales_report::filter::{filter, FilterCriteria};
use sales_report::models::{forecast, moving_average, ForecastOutcome, NotAvailableReason};
use sales_report::render::render;
use sales_report::resample::resample_daily;

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new(offset))
        .unwrap()
}

/// Deterministic, irregular daily quantities
fn noisy_quantities(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = (state * 1_103_515_245 + 12_345) % (1 << 31);
            ((state >> 16) % 30) as f64 + 5.0
        })
        .collect()
}

fn daily_records(product: &str, quantities: &[f64]) -> Vec<SalesRecord> {
    quantities
        .iter()
        .enumerate()
        .map(|(i, &q)| SalesRecord::new(day(i as u64), product, q))
        .collect()
}

fn mixed_records() -> Vec<SalesRecord> {
    let mut records = daily_records("Kopi", &noisy_quantities(40, 1));
    records.extend(daily_records("Teh", &noisy_quantities(25, 2)));
    records.push(SalesRecord::new(day(3), "Kopi", 7.0));
    records.push(SalesRecord::new(day(60), "Susu", 1.0));
    records
}

#[rstest]
#[case(0, 50, 10, 40)]
#[case(5, 30, 10, 25)]
#[case(20, 24, 22, 22)]
fn test_narrowing_range_never_grows_result(
    #[case] start: u64,
    #[case] end: u64,
    #[case] narrow_start: u64,
    #[case] narrow_end: u64,
) {
    let records = mixed_records();
    let wide = FilterCriteria::new(day(start), day(end), ["Kopi", "Teh", "Susu"]);
    let narrow = wide
        .clone()
        .with_range(Some(day(narrow_start)), Some(day(narrow_end)));

    assert!(filter(&records, &narrow).len() <= filter(&records, &wide).len());
}

#[test]
fn test_narrowing_products_never_grows_result() {
    let records = mixed_records();
    let all = FilterCriteria::new(day(0), day(90), ["Kopi", "Teh", "Susu"]);
    let some = all.clone().with_products(["Teh"]);
    let none = all.clone().with_products(Vec::<String>::new());

    let sizes = [
        filter(&records, &all).len(),
        filter(&records, &some).len(),
        filter(&records, &none).len(),
    ];
    assert_eq!(sizes, [records.len(), 25, 0]);
}

#[test]
fn test_resampling_is_day_complete() {
    let records = vec![
        SalesRecord::new(day(2), "Kopi", 1.0),
        SalesRecord::new(day(9), "Kopi", 2.0),
        SalesRecord::new(day(9), "Kopi", 2.0),
        SalesRecord::new(day(30), "Kopi", 4.0),
    ];
    let series = resample_daily(&records);

    assert_eq!(series.len(), 29);
    let dates = series.dates();
    assert!(dates.windows(2).all(|w| w[0].succ_opt() == Some(w[1])));
    assert_relative_eq!(series.total(), 9.0);
}

#[rstest]
fn test_moving_average_leading_gaps(#[values(3, 5, 7, 10, 14)] window: usize) {
    let series = resample_daily(&daily_records("Kopi", &noisy_quantities(30, 3)));
    let ma = moving_average(&series, window).unwrap();

    assert_eq!(ma.len(), series.len());
    assert_eq!(ma.leading_undefined(), window - 1);
    assert_eq!(ma.defined_count(), series.len() - (window - 1));

    let quantities = series.quantities();
    let expected = quantities[..window].iter().sum::<f64>() / window as f64;
    assert_relative_eq!(ma.trimmed()[0].1, expected, epsilon = 1e-9);
}

#[rstest]
#[case(3, 12, false)]
#[case(3, 13, true)]
#[case(7, 16, false)]
#[case(7, 17, true)]
#[case(14, 23, false)]
#[case(14, 24, true)]
fn test_forecast_iff_trimmed_length_exceeds_ten(
    #[case] window: usize,
    #[case] days: usize,
    #[case] expected: bool,
) {
    let series = resample_daily(&daily_records("Kopi", &noisy_quantities(days, 11)));
    let ma = moving_average(&series, window).unwrap();
    let outcome = forecast(&series, &ma, &ForecastSettings::default());

    assert_eq!(outcome.is_available(), expected);
    match outcome {
        ForecastOutcome::Available(forecast) => {
            assert_eq!(forecast.len(), 30);
            let dates: Vec<NaiveDate> = forecast.points().iter().map(|p| p.date).collect();
            assert_eq!(Some(dates[0]), series.last_date().and_then(|d| d.succ_opt()));
            assert!(dates.windows(2).all(|w| w[0].succ_opt() == Some(w[1])));
        }
        ForecastOutcome::NotAvailable(reason) => {
            assert_eq!(
                reason,
                NotAvailableReason::InsufficientHistory {
                    observations: 10,
                    required: 11
                }
            );
        }
    }
}

#[test]
fn test_fifteen_constant_days_example() {
    let records = daily_records("A", &[10.0; 15]);
    let criteria = FilterCriteria::new(day(0), day(14), ["A"]);
    let model = render(&records, &criteria, 7, &ForecastSettings::default()).unwrap();

    let report = &model.products[0];
    let trimmed = report.moving_average.trimmed();
    assert_eq!(trimmed.len(), 9);
    assert_eq!(trimmed[0].0, day(6));
    assert!(trimmed.iter().all(|(_, v)| (*v - 10.0).abs() < 1e-12));
    assert!(matches!(
        report.forecast,
        ForecastOutcome::NotAvailable(NotAvailableReason::InsufficientHistory {
            observations: 9,
            ..
        })
    ));
}

#[test]
fn test_twenty_days_example_produces_thirty_points() {
    let records = daily_records("A", &noisy_quantities(20, 5));
    let criteria = FilterCriteria::new(day(0), day(19), ["A"]);
    let model = render(&records, &criteria, 7, &ForecastSettings::default()).unwrap();

    let report = &model.products[0];
    assert_eq!(report.moving_average.defined_count(), 14);
    let forecast = report.forecast.series().expect("forecast available");
    assert_eq!(forecast.len(), 30);
    assert_eq!(forecast.first_date(), Some(day(20)));
    assert_eq!(forecast.last_date(), Some(day(49)));
}

#[test]
fn test_twenty_constant_days_forecast_flat_line() {
    let records = daily_records("A", &[10.0; 20]);
    let criteria = FilterCriteria::new(day(0), day(19), ["A"]);
    let model = render(&records, &criteria, 7, &ForecastSettings::default()).unwrap();

    let report = &model.products[0];
    assert_eq!(report.moving_average.defined_count(), 14);
    let forecast = report.forecast.series().expect("forecast available");
    assert_eq!(forecast.len(), 30);
    assert_eq!(forecast.first_date(), Some(day(20)));
    for value in forecast.values() {
        assert_relative_eq!(value, 10.0, epsilon = 1e-12);
    }
}

#[test]
fn test_sales_on_first_and_last_day_only_still_forecast() {
    let records = vec![
        SalesRecord::new(day(0), "Jarang", 8.0),
        SalesRecord::new(day(19), "Jarang", 5.0),
    ];
    let criteria = FilterCriteria::new(day(0), day(19), ["Jarang"]);
    let model = render(&records, &criteria, 3, &ForecastSettings::default()).unwrap();

    let report = &model.products[0];
    assert_eq!(report.actual.len(), 20);
    let forecast = report.forecast.series().expect("forecast available");
    assert_eq!(forecast.len(), 30);
    for value in forecast.values() {
        assert_relative_eq!(value, 5.0, epsilon = 1e-12);
    }
}

#[test]
fn test_one_failing_product_does_not_abort_report() {
    // ARIMA(8,1,0) needs 17 days, so the 14-day product fails to fit
    let mut records = daily_records("Short", &noisy_quantities(14, 4));
    records.extend(daily_records("Long", &noisy_quantities(30, 9)));
    let criteria = FilterCriteria::new(day(0), day(29), ["Short", "Long"]);
    let settings = ForecastSettings {
        order: (8, 1, 0),
        ..ForecastSettings::default()
    };

    let model = render(&records, &criteria, 3, &settings).unwrap();
    assert_eq!(model.products.len(), 2);
    // Products come back sorted by name
    assert_eq!(model.products[0].product, "Long");
    assert!(model.products[0].forecast.is_available());
    assert!(matches!(
        model.products[1].forecast,
        ForecastOutcome::NotAvailable(NotAvailableReason::FitFailed { .. })
    ));
}

#[test]
fn test_render_is_repeatable() {
    let records = mixed_records();
    let criteria = FilterCriteria::new(day(0), day(90), ["Kopi", "Teh", "Susu"]);
    let settings = ForecastSettings::default();

    let first = render(&records, &criteria, 7, &settings).unwrap();
    let second = render(&records, &criteria, 7, &settings).unwrap();
    assert_eq!(first, second);
}
