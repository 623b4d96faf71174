//! 时间分桶降采样集成测试

use chrono::{TimeZone, Utc};
use dalia::analytics::downsample::{downsample, BucketPoint, DownsampledSeries, FieldPolicy, RawPoint};

fn points(values: &[f64]) -> Vec<RawPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| RawPoint::new(Utc.timestamp_opt(1_718_400_000 + i as i64 * 30, 0).unwrap(), *v))
        .collect()
}

fn single(series: DownsampledSeries) -> Vec<BucketPoint> {
    match series {
        DownsampledSeries::Single(s) => s,
        _ => panic!("期望单序列输出"),
    }
}

mod bucket_counts {
    use super::*;

    #[test]
    fn test_never_exceeds_target() {
        for n in [1usize, 5, 99, 100, 101, 1000, 5003] {
            let pts = points(&(0..n).map(|i| i as f64).collect::<Vec<_>>());
            let out = single(downsample(&pts, 100, FieldPolicy::Average));
            assert!(out.len() <= 100, "点数 {} 时桶数 {} 超过目标", n, out.len());
        }
    }

    #[test]
    fn test_passthrough_preserves_everything() {
        let pts = points(&[4.2, 1.0, 8.8]);
        let out = single(downsample(&pts, 1000, FieldPolicy::Last));

        assert_eq!(out.len(), 3);
        for (bucket, raw) in out.iter().zip(pts.iter()) {
            assert_eq!(bucket.time, raw.time);
            assert_eq!(bucket.value, raw.value);
        }
    }

    #[test]
    fn test_zero_target_treated_as_one() {
        let pts = points(&[1.0, 2.0, 3.0]);
        let out = single(downsample(&pts, 0, FieldPolicy::Average));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 2.0);
    }
}

mod partition {
    use super::*;

    #[test]
    fn test_buckets_cover_all_points_exactly_once() {
        // 分组是连续切分：桶大小之和 = 原始点数
        let n = 1237;
        let target = 100;
        let mut covered = 0;
        for i in 0..target {
            let start = i * n / target;
            let end = (i + 1) * n / target;
            covered += end - start;
        }
        assert_eq!(covered, n, "每个原始点必须恰好进入一个桶");
    }

    #[test]
    fn test_last_policy_final_bucket_ends_on_last_point() {
        let values: Vec<f64> = (0..777).map(|i| i as f64).collect();
        let pts = points(&values);
        let out = single(downsample(&pts, 50, FieldPolicy::Last));

        assert_eq!(
            out.last().unwrap().value,
            776.0,
            "末桶的 last 值必须是序列最后一个点"
        );
    }

    #[test]
    fn test_output_strictly_increasing_in_time() {
        let pts = points(&(0..2000).map(|i| (i % 13) as f64).collect::<Vec<_>>());
        let out = single(downsample(&pts, 333, FieldPolicy::Average));
        for pair in out.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }
}

mod policies {
    use super::*;

    #[test]
    fn test_minmax_min_never_exceeds_max() {
        let values: Vec<f64> = (0..600).map(|i| ((i * 17) % 101) as f64).collect();
        let pts = points(&values);
        let (min, max) = match downsample(&pts, 60, FieldPolicy::MinMax) {
            DownsampledSeries::MinMax { min, max } => (min, max),
            _ => panic!("MinMax 策略应产出双序列"),
        };

        assert_eq!(min.len(), max.len(), "min/max 序列长度必须一致");
        for (lo, hi) in min.iter().zip(max.iter()) {
            assert_eq!(lo.time, hi.time, "min/max 桶时间戳必须对齐");
            assert!(lo.value <= hi.value);
        }
    }

    #[test]
    fn test_average_bounded_by_extremes() {
        let values: Vec<f64> = (0..480).map(|i| ((i * 7) % 53) as f64).collect();
        let pts = points(&values);
        let avg = single(downsample(&pts, 48, FieldPolicy::Average));
        let (min, max) = match downsample(&pts, 48, FieldPolicy::MinMax) {
            DownsampledSeries::MinMax { min, max } => (min, max),
            _ => unreachable!(),
        };

        for ((a, lo), hi) in avg.iter().zip(min.iter()).zip(max.iter()) {
            assert!(a.value >= lo.value && a.value <= hi.value);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        assert!(single(downsample(&[], 100, FieldPolicy::Last)).is_empty());
        match downsample(&[], 100, FieldPolicy::MinMax) {
            DownsampledSeries::MinMax { min, max } => {
                assert!(min.is_empty());
                assert!(max.is_empty());
            }
            _ => panic!("MinMax 策略应产出双序列"),
        }
    }
}
