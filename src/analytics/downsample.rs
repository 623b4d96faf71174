//! 时间分桶与降采样引擎
//!
//! 长时间窗口的原始序列可达数万点，图表只需要几百到一千多个点。
//! 本模块把时间有序的原始序列压缩到目标桶数以内：
//!
//! - 原始点数 ≤ 目标桶数：直通，不做任何聚合（短窗口保留全分辨率）；
//! - 原始点数 > 目标桶数：按"近似等点数"切成目标桶数个连续分组
//!   （自适应分桶，非等时宽），每组按字段策略归约。
//!
//! 字段策略是静态分类，不在运行时推断：
//! 累计计数器派生字段取桶内末值（last），瞬时电气量取均值（avg），
//! 毛刺敏感字段（THD 等）取 min/max 两条序列。

use chrono::{DateTime, Utc};

/// 字段聚合策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldPolicy {
    /// 瞬时量：桶内平均
    Average,
    /// 累计计数器：桶内末值（桶末状态）
    Last,
    /// 毛刺敏感量：桶内最小/最大，产出 `_min`/`_max` 两条序列
    MinMax,
}

/// 原始数据点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl RawPoint {
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self { time, value }
    }
}

/// 桶聚合结果点（桶时间戳取组内最早时间）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// 降采样输出：单序列或 min/max 双序列
#[derive(Debug, Clone, PartialEq)]
pub enum DownsampledSeries {
    Single(Vec<BucketPoint>),
    MinMax {
        min: Vec<BucketPoint>,
        max: Vec<BucketPoint>,
    },
}

/// 对时间有序的原始序列降采样
///
/// 输入必须按时间升序；输出保持时间升序，桶数 ≤ `target`，
/// 数据稀疏时可能更少。`target` 为 0 时按 1 处理。
pub fn downsample(points: &[RawPoint], target: usize, policy: FieldPolicy) -> DownsampledSeries {
    let target = target.max(1);

    // 直通：短序列一点一桶
    if points.len() <= target {
        return reduce_groups(points.iter().map(std::slice::from_ref), policy);
    }

    let n = points.len();
    let groups = (0..target).filter_map(move |i| {
        let start = i * n / target;
        let end = ((i + 1) * n / target).min(n);
        if start < end {
            Some(&points[start..end])
        } else {
            None
        }
    });
    reduce_groups(groups, policy)
}

fn reduce_groups<'a, I>(groups: I, policy: FieldPolicy) -> DownsampledSeries
where
    I: Iterator<Item = &'a [RawPoint]>,
{
    match policy {
        FieldPolicy::Average => DownsampledSeries::Single(
            groups
                .map(|g| BucketPoint {
                    time: g[0].time,
                    value: g.iter().map(|p| p.value).sum::<f64>() / g.len() as f64,
                })
                .collect(),
        ),
        FieldPolicy::Last => DownsampledSeries::Single(
            groups
                .map(|g| BucketPoint {
                    time: g[0].time,
                    value: g[g.len() - 1].value,
                })
                .collect(),
        ),
        FieldPolicy::MinMax => {
            let mut min_series = Vec::new();
            let mut max_series = Vec::new();
            for g in groups {
                let time = g[0].time;
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for p in g {
                    min = min.min(p.value);
                    max = max.max(p.value);
                }
                min_series.push(BucketPoint { time, value: min });
                max_series.push(BucketPoint { time, value: max });
            }
            DownsampledSeries::MinMax {
                min: min_series,
                max: max_series,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn points(values: &[f64]) -> Vec<RawPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                RawPoint::new(
                    Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap(),
                    *v,
                )
            })
            .collect()
    }

    fn single(series: DownsampledSeries) -> Vec<BucketPoint> {
        match series {
            DownsampledSeries::Single(s) => s,
            _ => panic!("期望单序列输出"),
        }
    }

    #[test]
    fn test_passthrough_when_below_target() {
        let pts = points(&[1.0, 2.0, 3.0, 4.0]);
        let out = single(downsample(&pts, 10, FieldPolicy::Average));

        assert_eq!(out.len(), pts.len(), "直通模式桶数应等于原始点数");
        for (bucket, raw) in out.iter().zip(pts.iter()) {
            assert_eq!(bucket.time, raw.time);
            assert_eq!(bucket.value, raw.value, "直通模式值不得改变");
        }
    }

    #[test]
    fn test_bucket_count_equals_target() {
        let pts = points(&(0..1000).map(|i| i as f64).collect::<Vec<_>>());
        let out = single(downsample(&pts, 100, FieldPolicy::Average));
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn test_output_chronologically_ordered() {
        let pts = points(&(0..537).map(|i| (i % 7) as f64).collect::<Vec<_>>());
        let out = single(downsample(&pts, 50, FieldPolicy::Last));
        for pair in out.windows(2) {
            assert!(pair[0].time < pair[1].time, "输出必须按时间升序");
        }
    }

    #[test]
    fn test_average_within_constituent_range() {
        let values: Vec<f64> = (0..300).map(|i| ((i * 31) % 97) as f64).collect();
        let pts = points(&values);
        let out = single(downsample(&pts, 30, FieldPolicy::Average));

        let n = pts.len();
        for (i, bucket) in out.iter().enumerate() {
            let group = &pts[i * n / 30..(i + 1) * n / 30];
            let min = group.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
            let max = group.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
            assert!(
                bucket.value >= min && bucket.value <= max,
                "均值桶的值必须落在组内 [min, max] 之间"
            );
        }
    }

    #[test]
    fn test_last_policy_takes_end_of_bucket() {
        // 10 个点压成 2 桶：每桶 5 个点，取末值
        let pts = points(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let out = single(downsample(&pts, 2, FieldPolicy::Last));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, 5.0);
        assert_eq!(out[1].value, 10.0);
        assert_eq!(out[0].time, pts[0].time, "桶时间戳取组内最早时间");
        assert_eq!(out[1].time, pts[5].time);
    }

    #[test]
    fn test_min_max_policy_produces_two_series() {
        let pts = points(&[5.0, 1.0, 9.0, 4.0, 7.0, 2.0]);
        let (min, max) = match downsample(&pts, 2, FieldPolicy::MinMax) {
            DownsampledSeries::MinMax { min, max } => (min, max),
            _ => panic!("MinMax 策略应产出双序列"),
        };

        assert_eq!(min.len(), 2);
        assert_eq!(max.len(), 2);
        assert_eq!(min[0].value, 1.0);
        assert_eq!(max[0].value, 9.0);
        assert_eq!(min[1].value, 2.0);
        assert_eq!(max[1].value, 7.0);
    }

    #[test]
    fn test_empty_input() {
        let out = single(downsample(&[], 100, FieldPolicy::Average));
        assert!(out.is_empty(), "空输入应产出空序列而非错误");
    }
}
