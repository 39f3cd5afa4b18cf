use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use compound_tracker_core::currency::format_currency;
use compound_tracker_core::errors::CoreError;
use compound_tracker_core::models::app_state::{AppState, LocalSnapshot, APP_STATE_VERSION};
use compound_tracker_core::models::chart::{ChartRange, GrowthPoint};
use compound_tracker_core::models::profile::{ConfigOverrides, Profile, ProfileUpdate, ValuationConfig};
use compound_tracker_core::models::transaction::{NewTransaction, Transaction, TransactionType};
use compound_tracker_core::services::chart_service::{decimate, ChartService};
use compound_tracker_core::services::growth_service::grow;
use compound_tracker_core::services::profile_service::{validate_config, ProfileService};
use compound_tracker_core::services::valuation_service::ValuationService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
}

fn config() -> ValuationConfig {
    ValuationConfig::new(1000.0, 7.0, d(2023, 1, 1))
}

fn tx(kind: TransactionType, amount: f64, date: NaiveDate) -> Transaction {
    Transaction::new(kind, amount, date, ts(0))
}

fn approx(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

// ═══════════════════════════════════════════════════════════════════
//  Growth
// ═══════════════════════════════════════════════════════════════════

mod growth {
    use super::*;

    #[test]
    fn zero_days_is_principal() {
        assert_eq!(grow(1234.56, 7.0, 0), 1234.56);
        assert_eq!(grow(0.0, 7.0, 0), 0.0);
    }

    #[test]
    fn one_year_at_seven_percent() {
        let value = grow(1000.0, 7.0, 365);
        assert!(approx(value, 1072.50, 0.01), "got {value}");
    }

    #[test]
    fn matches_daily_compounding_formula() {
        let expected = 500.0 * (1.0 + 0.07 / 365.0_f64).powf(184.0);
        assert!(approx(grow(500.0, 7.0, 184), expected, 1e-9));
        assert!(approx(expected, 517.957, 0.001));
    }

    #[test]
    fn zero_rate_is_flat() {
        assert_eq!(grow(1000.0, 0.0, 3650), 1000.0);
    }

    #[test]
    fn monotonic_in_days_for_positive_rate() {
        let mut previous = grow(100.0, 5.0, 0);
        for days in 1..=800 {
            let next = grow(100.0, 5.0, days);
            assert!(next > previous, "day {days}");
            previous = next;
        }
    }

    #[test]
    fn negative_rate_shrinks() {
        assert!(grow(1000.0, -3.0, 365) < 1000.0);
    }

    #[test]
    fn nan_propagates() {
        assert!(grow(f64::NAN, 7.0, 10).is_nan());
        assert!(grow(1000.0, f64::NAN, 10).is_nan());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Valuation
// ═══════════════════════════════════════════════════════════════════

mod valuation {
    use super::*;

    #[test]
    fn principal_only_after_one_year() {
        let value = ValuationService::new().current_value(&config(), &[], d(2024, 1, 1));
        assert!(approx(value, 1072.50, 0.01), "got {value}");
    }

    #[test]
    fn principal_plus_mid_year_addition() {
        let txs = vec![tx(TransactionType::Addition, 500.0, d(2023, 7, 1))];
        let value = ValuationService::new().current_value(&config(), &txs, d(2024, 1, 1));
        let expected = grow(1000.0, 7.0, 365) + grow(500.0, 7.0, 184);
        assert!(approx(value, expected, 1e-9));
        assert!(approx(value, 1590.458, 0.01), "got {value}");
    }

    #[test]
    fn before_start_is_principal() {
        let value = ValuationService::new().current_value(&config(), &[], d(2022, 6, 1));
        assert_eq!(value, 1000.0);
    }

    #[test]
    fn on_start_day_is_principal() {
        let value = ValuationService::new().current_value(&config(), &[], d(2023, 1, 1));
        assert_eq!(value, 1000.0);
    }

    #[test]
    fn future_transaction_is_ignored() {
        let service = ValuationService::new();
        let txs = vec![tx(TransactionType::Addition, 500.0, d(2024, 6, 1))];
        assert_eq!(
            service.current_value(&config(), &txs, d(2024, 1, 1)),
            service.current_value(&config(), &[], d(2024, 1, 1))
        );
    }

    #[test]
    fn transaction_on_evaluation_day_counts_at_face_value() {
        let service = ValuationService::new();
        let txs = vec![tx(TransactionType::Addition, 250.0, d(2024, 1, 1))];
        let with = service.current_value(&config(), &txs, d(2024, 1, 1));
        let without = service.current_value(&config(), &[], d(2024, 1, 1));
        assert!(approx(with - without, 250.0, 1e-9));
    }

    #[test]
    fn withdrawal_subtracts_its_grown_value() {
        let service = ValuationService::new();
        let txs = vec![tx(TransactionType::Withdrawal, 200.0, d(2023, 7, 1))];
        let value = service.current_value(&config(), &txs, d(2024, 1, 1));
        let expected = grow(1000.0, 7.0, 365) - grow(200.0, 7.0, 184);
        assert!(approx(value, expected, 1e-9));
    }

    #[test]
    fn malformed_transaction_date_contributes_nothing() {
        let service = ValuationService::new();
        let mut bad = tx(TransactionType::Addition, 500.0, d(2023, 7, 1));
        bad.date = "July 1st".into();
        assert_eq!(
            service.current_value(&config(), &[bad], d(2024, 1, 1)),
            service.current_value(&config(), &[], d(2024, 1, 1))
        );
    }

    #[test]
    fn malformed_start_date_values_at_zero() {
        let mut broken = config();
        broken.start_date = "2023-02-30".into();
        let txs = vec![tx(TransactionType::Addition, 500.0, d(2023, 7, 1))];
        assert_eq!(
            ValuationService::new().current_value(&broken, &txs, d(2024, 1, 1)),
            0.0
        );
    }

    #[test]
    fn overdrawn_history_goes_negative() {
        let service = ValuationService::new();
        let txs = vec![tx(TransactionType::Withdrawal, 5000.0, d(2023, 2, 1))];
        assert!(service.current_value(&config(), &txs, d(2024, 1, 1)) < 0.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let service = ValuationService::new();
        let a = tx(TransactionType::Addition, 100.0, d(2023, 3, 1));
        let b = tx(TransactionType::Withdrawal, 40.0, d(2023, 9, 1));
        let forward = service.current_value(&config(), &[a.clone(), b.clone()], d(2024, 1, 1));
        let backward = service.current_value(&config(), &[b, a], d(2024, 1, 1));
        assert!(approx(forward, backward, 1e-9));
    }
}

mod withdrawal_validation {
    use super::*;

    #[test]
    fn within_balance_is_ok() {
        let service = ValuationService::new();
        assert!(service
            .validate_withdrawal(&config(), &[], 1000.0, d(2024, 1, 1))
            .is_ok());
    }

    #[test]
    fn over_balance_is_rejected() {
        let service = ValuationService::new();
        let err = service
            .validate_withdrawal(&config(), &[], 5000.0, d(2024, 1, 1))
            .unwrap_err();
        match err {
            CoreError::InsufficientBalance { requested, available } => {
                assert_eq!(requested, 5000.0);
                assert!(approx(available, 1072.50, 0.01));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Growth Series
// ═══════════════════════════════════════════════════════════════════

mod series {
    use super::*;

    #[test]
    fn one_point_per_day_including_both_ends() {
        let series = ValuationService::new().generate_growth_series(&config(), &[], 365);
        assert_eq!(series.len(), 366);
        assert_eq!(series[0].day, 0);
        assert_eq!(series[0].date, d(2023, 1, 1));
        assert_eq!(series[0].amount, 1000.0);
        assert_eq!(series[365].date, d(2024, 1, 1));
    }

    #[test]
    fn zero_horizon_is_single_point() {
        let series = ValuationService::new().generate_growth_series(&config(), &[], 0);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn negative_horizon_is_empty() {
        assert!(ValuationService::new()
            .generate_growth_series(&config(), &[], -1)
            .is_empty());
    }

    #[test]
    fn malformed_start_date_is_empty() {
        let mut broken = config();
        broken.start_date = "".into();
        assert!(ValuationService::new()
            .generate_growth_series(&broken, &[], 30)
            .is_empty());
    }

    #[test]
    fn last_point_matches_current_value() {
        let service = ValuationService::new();
        let txs = vec![
            tx(TransactionType::Addition, 500.0, d(2023, 7, 1)),
            tx(TransactionType::Withdrawal, 120.0, d(2023, 10, 15)),
        ];
        let series = service.generate_growth_series(&config(), &txs, 365);
        let last = series.last().unwrap();
        assert_eq!(last.amount, service.current_value(&config(), &txs, d(2024, 1, 1)));
    }

    #[test]
    fn every_point_matches_current_value_on_its_date() {
        let service = ValuationService::new();
        let txs = vec![tx(TransactionType::Addition, 75.0, d(2023, 1, 20))];
        for point in service.generate_growth_series(&config(), &txs, 40) {
            assert_eq!(point.amount, service.current_value(&config(), &txs, point.date));
        }
    }

    #[test]
    fn marks_transaction_days() {
        let txs = vec![
            tx(TransactionType::Addition, 500.0, d(2023, 1, 11)),
            tx(TransactionType::Addition, 20.0, d(2023, 1, 11)),
            tx(TransactionType::Withdrawal, 10.0, d(2023, 1, 21)),
        ];
        let series = ValuationService::new().generate_growth_series(&config(), &txs, 30);

        let marked: Vec<i64> = series
            .iter()
            .filter(|p| p.has_transaction)
            .map(|p| p.day)
            .collect();
        assert_eq!(marked, vec![10, 20]);
        assert_eq!(series[10].transactions_on_this_day.len(), 2);
        assert_eq!(series[20].transactions_on_this_day.len(), 1);
        assert!(series[11].transactions_on_this_day.is_empty());
    }

    #[test]
    fn addition_raises_the_curve_from_its_day() {
        let txs = vec![tx(TransactionType::Addition, 500.0, d(2023, 1, 11))];
        let series = ValuationService::new().generate_growth_series(&config(), &txs, 30);
        assert!(series[10].amount - series[9].amount > 499.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Chart
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    fn flat_series(len: usize, markers: &[usize]) -> Vec<GrowthPoint> {
        (0..len)
            .map(|i| GrowthPoint {
                date: d(2023, 1, 1) + chrono::Days::new(i as u64),
                day: i as i64,
                amount: 1000.0,
                has_transaction: markers.contains(&i),
                transactions_on_this_day: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn short_series_untouched() {
        let series = flat_series(100, &[]);
        assert_eq!(decimate(series.clone(), 100), series);
    }

    #[test]
    fn zero_max_points_untouched() {
        assert_eq!(decimate(flat_series(500, &[]), 0).len(), 500);
    }

    #[test]
    fn one_year_decimates_by_four() {
        let kept = decimate(flat_series(366, &[]), 100);
        assert_eq!(kept.len(), 93);
        assert_eq!(kept.first().unwrap().day, 0);
        assert_eq!(kept.last().unwrap().day, 365);
        assert!(kept[1..kept.len() - 1].iter().all(|p| p.day % 4 == 0));
    }

    #[test]
    fn markers_survive_decimation() {
        let kept = decimate(flat_series(366, &[5, 201]), 100);
        assert_eq!(kept.len(), 95);
        assert!(kept.iter().any(|p| p.day == 5));
        assert!(kept.iter().any(|p| p.day == 201));
    }

    #[test]
    fn decimation_preserves_order() {
        let kept = decimate(flat_series(1826, &[7, 999]), 100);
        assert!(kept.windows(2).all(|w| w[0].day < w[1].day));
    }

    #[test]
    fn one_month_chart_is_not_decimated() {
        let chart = ChartService::new().generate_chart(&config(), &[], ChartRange::OneMonth);
        assert_eq!(chart.len(), 31);
    }

    #[test]
    fn five_year_chart_keeps_markers() {
        let txs = vec![tx(TransactionType::Addition, 10.0, d(2025, 3, 3))];
        let chart = ChartService::new().generate_chart(&config(), &txs, ChartRange::FiveYears);
        assert!(chart.len() <= 102);
        assert!(chart.iter().any(|p| p.has_transaction && p.date == d(2025, 3, 3)));
        assert_eq!(chart.last().unwrap().day, 1825);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Currency
// ═══════════════════════════════════════════════════════════════════

mod currency {
    use super::*;

    #[test]
    fn formats_dollars_and_cents() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(1072.500983), "$1,072.50");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn huge_amounts_keep_every_digit() {
        assert_eq!(format_currency(1e20), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(-1e18), "-$1,000,000,000,000,000,000.00");
    }

    #[test]
    fn non_finite_amounts() {
        assert_eq!(format_currency(f64::INFINITY), "$inf");
        assert_eq!(format_currency(f64::NAN), "$NaN");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Profiles
// ═══════════════════════════════════════════════════════════════════

mod profiles {
    use super::*;

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: format!("Profile {id}"),
            emoji: "🐷".into(),
            config: config(),
            transactions: Vec::new(),
            created_at: ts(0),
            last_modified: ts(0),
        }
    }

    fn two_profiles() -> AppState {
        let service = ProfileService::new();
        let state = AppState::with_profile(profile("a"), ts(0));
        service.add_profile(&state, profile("b"), ts(0))
    }

    #[test]
    fn create_uses_defaults_and_truncates_name() {
        let service = ProfileService::new();
        let long = "n".repeat(70);
        let p = service
            .create_profile(&long, "🏦", &ConfigOverrides::default(), d(2024, 3, 1), ts(1))
            .unwrap();
        assert_eq!(p.name.chars().count(), 50);
        assert_eq!(p.config, ValuationConfig::new(1000.0, 7.0, d(2024, 3, 1)));
        assert!(p.transactions.is_empty());
        assert_eq!(p.created_at, ts(1));
    }

    #[test]
    fn create_rejects_negative_amount() {
        let overrides = ConfigOverrides {
            initial_amount: Some(-1.0),
            ..ConfigOverrides::default()
        };
        let err = ProfileService::new()
            .create_profile("x", "", &overrides, d(2024, 1, 1), ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn add_makes_new_profile_active() {
        let state = two_profiles();
        assert_eq!(state.profile_count(), 2);
        assert_eq!(state.active_profile_id, "b");
    }

    #[test]
    fn switch() {
        let state = two_profiles();
        let next = ProfileService::new().switch_profile(&state, "a", ts(2)).unwrap();
        assert_eq!(next.active_profile_id, "a");
        assert_eq!(next.last_modified, ts(2));
        assert_eq!(state.active_profile_id, "b");
    }

    #[test]
    fn switch_to_unknown_fails() {
        let err = ProfileService::new()
            .switch_profile(&two_profiles(), "zzz", ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ProfileNotFound(id) if id == "zzz"));
    }

    #[test]
    fn update_name_only() {
        let state = two_profiles();
        let next = ProfileService::new()
            .update_profile(&state, "a", &ProfileUpdate::name("Renamed"), ts(3))
            .unwrap();
        let p = next.profile("a").unwrap();
        assert_eq!(p.name, "Renamed");
        assert_eq!(p.emoji, "🐷");
        assert_eq!(p.config, config());
        assert_eq!(p.last_modified, ts(3));
    }

    #[test]
    fn update_rejects_bad_config() {
        let mut bad = config();
        bad.start_date = "tomorrow".into();
        let err = ProfileService::new()
            .update_profile(&two_profiles(), "a", &ProfileUpdate::config(bad), ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn delete_inactive_keeps_active() {
        let next = ProfileService::new()
            .delete_profile(&two_profiles(), "a", ts(0))
            .unwrap();
        assert_eq!(next.profile_count(), 1);
        assert_eq!(next.active_profile_id, "b");
    }

    #[test]
    fn delete_active_repoints() {
        let next = ProfileService::new()
            .delete_profile(&two_profiles(), "b", ts(0))
            .unwrap();
        assert_eq!(next.active_profile_id, "a");
        assert!(next.profile("b").is_none());
    }

    #[test]
    fn delete_last_profile_fails() {
        let state = AppState::with_profile(profile("only"), ts(0));
        let err = ProfileService::new()
            .delete_profile(&state, "only", ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::LastProfile));
    }

    #[test]
    fn delete_unknown_fails() {
        let err = ProfileService::new()
            .delete_profile(&two_profiles(), "nope", ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ProfileNotFound(_)));
    }

    #[test]
    fn project_keeps_one_profile() {
        let projected = ProfileService::new()
            .project_profile(&two_profiles(), "a")
            .unwrap();
        assert_eq!(projected.profile_count(), 1);
        assert_eq!(projected.active_profile_id, "a");
    }

    #[test]
    fn validate_config_rules() {
        assert!(validate_config(&config()).is_ok());

        let mut c = config();
        c.initial_amount = f64::NAN;
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.annual_interest_rate = f64::INFINITY;
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.annual_interest_rate = -2.0;
        assert!(validate_config(&c).is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transactions
// ═══════════════════════════════════════════════════════════════════

mod transactions {
    use super::*;

    fn state() -> AppState {
        let p = ProfileService::new()
            .create_profile("Main", "", &ConfigOverrides::default(), d(2023, 1, 1), ts(0))
            .unwrap();
        AppState::with_profile(p, ts(0))
    }

    #[test]
    fn build_defaults_date_to_today() {
        let new = NewTransaction {
            amount: 20.0,
            ..NewTransaction::default()
        };
        let t = ProfileService::new()
            .build_transaction(new, d(2024, 2, 2), ts(4))
            .unwrap();
        assert_eq!(t.date, "2024-02-02");
        assert_eq!(t.created_at, ts(4));
        assert_eq!(t.note, "");
    }

    #[test]
    fn build_keeps_note() {
        let new = NewTransaction::addition(5.0, d(2023, 5, 5)).with_note("gift");
        let t = ProfileService::new()
            .build_transaction(new, d(2024, 1, 1), ts(0))
            .unwrap();
        assert_eq!(t.note, "gift");
        assert_eq!(t.date, "2023-05-05");
    }

    #[test]
    fn build_rejects_non_positive_amounts() {
        let service = ProfileService::new();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let new = NewTransaction::addition(amount, d(2023, 5, 5));
            assert!(
                matches!(
                    service.build_transaction(new, d(2024, 1, 1), ts(0)),
                    Err(CoreError::ValidationError(_))
                ),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn add_appends_to_active_profile() {
        let service = ProfileService::new();
        let state = state();
        let t = tx(TransactionType::Addition, 10.0, d(2023, 4, 4));
        let next = service.add_transaction(&state, t.clone(), ts(5)).unwrap();
        let active = next.active_profile().unwrap();
        assert_eq!(active.transactions, vec![t]);
        assert_eq!(active.last_modified, ts(5));
        assert!(state.active_profile().unwrap().transactions.is_empty());
    }

    #[test]
    fn delete_removes_by_id() {
        let service = ProfileService::new();
        let t = tx(TransactionType::Addition, 10.0, d(2023, 4, 4));
        let id = t.id.clone();
        let with = service.add_transaction(&state(), t, ts(0)).unwrap();
        let without = service.delete_transaction(&with, &id, ts(1)).unwrap();
        assert!(without.active_profile().unwrap().transactions.is_empty());
    }

    #[test]
    fn delete_unknown_fails() {
        let err = ProfileService::new()
            .delete_transaction(&state(), "missing", ts(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::TransactionNotFound(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Merge & Repair
// ═══════════════════════════════════════════════════════════════════

mod merge {
    use super::*;

    fn named(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: id.to_uppercase(),
            emoji: String::new(),
            config: config(),
            transactions: Vec::new(),
            created_at: ts(0),
            last_modified: ts(0),
        }
    }

    #[test]
    fn no_snapshot_returns_baseline() {
        let baseline = AppState::with_profile(named("a"), ts(0));
        let merged = ProfileService::new().merge_data(baseline.clone(), None, ts(9));
        assert_eq!(merged, baseline);
    }

    #[test]
    fn snapshot_profiles_replace_baseline_wholesale() {
        let baseline = AppState::with_profile(named("a"), ts(0));
        let local = LocalSnapshot::from(AppState::with_profile(named("b"), ts(1)));
        let merged = ProfileService::new().merge_data(baseline, Some(local), ts(9));

        assert_eq!(merged.profiles.keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(merged.active_profile_id, "b");
        assert_eq!(merged.last_modified, ts(9));
    }

    #[test]
    fn absent_snapshot_fields_keep_baseline() {
        let baseline = AppState::with_profile(named("a"), ts(0));
        let local = LocalSnapshot {
            active_profile_id: Some("zzz".into()),
            ..LocalSnapshot::default()
        };
        let merged = ProfileService::new().merge_data(baseline, Some(local), ts(9));
        assert!(merged.profile("a").is_some());
        assert_eq!(merged.active_profile_id, "zzz");
        assert_eq!(merged.version, APP_STATE_VERSION);
    }

    #[test]
    fn transactions_are_sorted_by_date() {
        let mut p = named("a");
        let mut bad = tx(TransactionType::Addition, 1.0, d(2023, 1, 1));
        bad.date = "???".into();
        p.transactions = vec![
            tx(TransactionType::Addition, 3.0, d(2023, 9, 1)),
            bad,
            tx(TransactionType::Addition, 1.0, d(2023, 2, 1)),
            tx(TransactionType::Addition, 2.0, d(2023, 5, 1)),
        ];
        let local = LocalSnapshot::from(AppState::with_profile(p, ts(0)));
        let merged = ProfileService::new().merge_data(
            AppState::with_profile(named("x"), ts(0)),
            Some(local),
            ts(0),
        );

        let amounts: Vec<f64> = merged.profile("a").unwrap().transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 1.0]);
        assert_eq!(merged.profile("a").unwrap().transactions[3].date, "???");
    }

    #[test]
    fn repair_repoints_dangling_active_id() {
        let mut state = AppState::with_profile(named("b"), ts(0));
        state.profiles.insert("a".into(), named("a"));
        state.active_profile_id = "gone".into();
        let repaired = ProfileService::new().repair(state).unwrap();
        assert_eq!(repaired.active_profile_id, "a");
    }

    #[test]
    fn repair_truncates_names_and_stamps_version() {
        let mut p = named("a");
        p.name = "y".repeat(90);
        let mut state = AppState::with_profile(p, ts(0));
        state.version = String::new();
        let repaired = ProfileService::new().repair(state).unwrap();
        assert_eq!(repaired.profile("a").unwrap().name.len(), 50);
        assert_eq!(repaired.version, APP_STATE_VERSION);
    }

    #[test]
    fn repair_rejects_empty_document() {
        let mut state = AppState::with_profile(named("a"), ts(0));
        state.profiles.clear();
        let err = ProfileService::new().repair(state).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDocument(_)));
    }
}
