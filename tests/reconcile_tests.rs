//! 计数器对账引擎集成测试

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use dalia::analytics::reconcile::{
    endpoint_difference, grouped_totals, round2, wh_to_kwh, window_total, CounterSample, Grouping,
};

fn santiago() -> Tz {
    "America/Santiago".parse().unwrap()
}

fn series(values: &[Option<f64>]) -> Vec<CounterSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| CounterSample::new(Utc.timestamp_opt(1_718_400_000 + i as i64 * 900, 0).unwrap(), *v))
        .collect()
}

mod window_totals {
    use super::*;

    #[test]
    fn test_monotonic_series_equals_endpoint_difference() {
        let s = series(&[Some(1000.0), Some(1250.0), Some(1400.0), Some(1900.0)]);
        assert_eq!(window_total(&s), Some(900.0));
        assert_eq!(
            window_total(&s),
            endpoint_difference(&s),
            "无复位时两种策略必须一致"
        );
    }

    #[test]
    fn test_reset_mid_window_is_not_lost() {
        // 复位后继续累计：差值累加把复位前后两段消耗都计入
        let s = series(&[Some(100.0), Some(150.0), Some(40.0), Some(90.0)]);
        assert_eq!(window_total(&s), Some(140.0));
        assert_eq!(endpoint_difference(&s), Some(0.0), "端点差值会把该窗口整体报 0");
    }

    #[test]
    fn test_multiple_resets() {
        let s = series(&[Some(10.0), Some(50.0), Some(5.0), Some(30.0), Some(2.0), Some(12.0)]);
        // (50-10) + 5 + (30-5) + 2 + (12-2)
        assert_eq!(window_total(&s), Some(82.0));
    }

    #[test]
    fn test_total_is_non_negative_for_decreasing_series() {
        let s = series(&[Some(900.0), Some(700.0), Some(400.0)]);
        let total = window_total(&s).unwrap();
        assert!(total >= 0.0, "消耗总量不允许为负");
    }

    #[test]
    fn test_absent_readings_do_not_fabricate_resets() {
        let s = series(&[Some(500.0), None, None, Some(520.0)]);
        assert_eq!(window_total(&s), Some(20.0), "缺失读数必须跳过而非按 0");
    }

    #[test]
    fn test_insufficient_data_is_none_not_error() {
        assert_eq!(window_total(&series(&[])), None);
        assert_eq!(window_total(&series(&[Some(7.0)])), None);
        assert_eq!(window_total(&series(&[None, None])), None);
    }

    #[test]
    fn test_reconciliation_is_deterministic() {
        let s = series(&[Some(3.0), Some(9.0), Some(1.0), Some(4.0)]);
        assert_eq!(window_total(&s), window_total(&s));
    }
}

mod grouping {
    use super::*;

    #[test]
    fn test_day_keys_use_reference_timezone() {
        let tz = santiago();
        // 2024-06-11 01:00 UTC = 2024-06-10 21:00 圣地亚哥（UTC-4）
        let late = Utc.with_ymd_and_hms(2024, 6, 11, 1, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 11, 2, 0, 0).unwrap();
        let samples = vec![
            CounterSample::new(late, Some(100.0)),
            CounterSample::new(later, Some(130.0)),
        ];

        let totals = grouped_totals(&samples, Grouping::Day, tz);
        assert!(
            totals.contains_key("2024-06-10"),
            "UTC 时间跨午夜的读数应落在参考时区的前一天"
        );
        assert_eq!(totals["2024-06-10"], 30.0);
    }

    #[test]
    fn test_periods_with_single_reading_are_omitted() {
        let tz = santiago();
        let mk = |d, h, v| {
            let local = tz.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap();
            CounterSample::new(local.with_timezone(&Utc), Some(v))
        };
        let samples = vec![mk(1, 8, 10.0), mk(1, 20, 25.0), mk(2, 12, 30.0)];

        let totals = grouped_totals(&samples, Grouping::Day, tz);
        assert_eq!(totals.len(), 1, "单读数周期应省略，不补零");
        assert_eq!(totals["2024-06-01"], 15.0);
    }

    #[test]
    fn test_month_grouping_with_reset() {
        let tz = santiago();
        let mk = |m, d, v| {
            let local = tz.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap();
            CounterSample::new(local.with_timezone(&Utc), Some(v))
        };
        let samples = vec![
            mk(3, 1, 100.0),
            mk(3, 15, 700.0),
            mk(3, 20, 50.0), // 月中复位
            mk(3, 31, 250.0),
            mk(4, 1, 255.0),
            mk(4, 30, 400.0),
        ];

        let totals = grouped_totals(&samples, Grouping::Month, tz);
        assert_eq!(totals["2024-03"], 850.0, "月内复位应计入复位点");
        assert_eq!(totals["2024-04"], 145.0);
    }

    #[test]
    fn test_keys_are_chronologically_sorted() {
        let tz = santiago();
        let mk = |d, h, v| {
            let local = tz.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap();
            CounterSample::new(local.with_timezone(&Utc), Some(v))
        };
        let samples = vec![
            mk(3, 8, 1.0),
            mk(3, 20, 2.0),
            mk(1, 8, 1.0),
            mk(1, 20, 2.0),
            mk(2, 8, 1.0),
            mk(2, 20, 2.0),
        ];

        let keys: Vec<String> = grouped_totals(&samples, Grouping::Day, tz)
            .into_keys()
            .collect();
        assert_eq!(keys, vec!["2024-06-01", "2024-06-02", "2024-06-03"]);
    }
}

mod presentation {
    use super::*;

    #[test]
    fn test_wh_to_kwh_applies_only_at_presentation() {
        // 先求和再换算：换算不改变和的比例
        let s = series(&[Some(0.0), Some(2500.0)]);
        let wh = window_total(&s).unwrap();
        assert_eq!(round2(wh_to_kwh(wh)), 2.5);
    }

    #[test]
    fn test_round2_is_presentation_only() {
        assert_eq!(round2(1.2349), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
