use std::collections::HashMap;

use roaring::{RoaringBitmap, RoaringTreemap};
use tracing::warn;

use crate::{
    error::Error,
    id_generator::{IdGenerator, ParticleId, validate_limits},
    statics::{DEFAULT_DEPTH_LIMITS, DEFAULT_TIMELINE, DEPTH_BINS, LAT_BINS, LON_BINS, TIME_BINS},
};

/// 時空間エンコード型の識別子生成器
///
/// 経度・緯度を1度刻みのビンに、深度・時刻を設定済み範囲で正規化した
/// ビンに変換し、セルキー32bit + セル内シーケンス32bitの識別子を発行する。
/// 返却された識別子はセル単位で再利用される。
#[derive(Debug)]
pub struct SpatioTemporalIdGenerator {
    depth_limits: [f64; 2],
    timeline: [f64; 2],
    /// 各セルの次のシーケンス番号
    ///
    /// 32bitのシーケンス空間を使い切ったことを区別するためu64で保持する。
    counters: HashMap<u32, u64>,
    /// セルごとの返却済みシーケンス番号
    released: HashMap<u32, RoaringBitmap>,
    /// 発行済みで未返却の識別子
    in_use: RoaringTreemap,
    total_generated: u64,
}

impl Default for SpatioTemporalIdGenerator {
    fn default() -> Self {
        Self {
            depth_limits: DEFAULT_DEPTH_LIMITS,
            timeline: DEFAULT_TIMELINE,
            counters: HashMap::new(),
            released: HashMap::new(),
            in_use: RoaringTreemap::new(),
            total_generated: 0,
        }
    }
}

impl SpatioTemporalIdGenerator {
    /// 既定の範囲設定で生成器を作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 位置と時刻からセルキーを計算する
    fn cell_key(&self, lon: f64, lat: f64, depth: f64, time: f64) -> Result<u32, Error> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::LatitudeOutOfRange { latitude: lat });
        }

        if !lon.is_finite() {
            return Err(Error::LongitudeOutOfRange { longitude: lon });
        }

        let [d_min, d_max] = self.depth_limits;
        if !(d_min..=d_max).contains(&depth) {
            return Err(Error::DepthOutOfRange {
                depth,
                min: d_min,
                max: d_max,
            });
        }

        let [t_min, t_max] = self.timeline;
        if !(t_min..=t_max).contains(&time) {
            return Err(Error::TimeOutOfRange {
                time,
                min: t_min,
                max: t_max,
            });
        }

        // 経度は[-180, 180)に折り返してからビン化する
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        let lon_bin = ((lon + 180.0).floor() as u32).min(LON_BINS - 1);
        let lat_bin = ((lat + 90.0).floor() as u32).min(LAT_BINS - 1);
        let depth_bin = normalized_bin(depth, d_min, d_max, DEPTH_BINS);
        let time_bin = normalized_bin(time, t_min, t_max, TIME_BINS);

        Ok((lon_bin << 23) | (lat_bin << 15) | (depth_bin << 8) | time_bin)
    }
}

/// 値を[min, max]で正規化してビン番号に変換する
///
/// value == max は最終ビンに丸める。
fn normalized_bin(value: f64, min: f64, max: f64, bins: u32) -> u32 {
    let relative = (value - min) / (max - min);
    ((relative * bins as f64).floor() as u32).min(bins - 1)
}

impl IdGenerator for SpatioTemporalIdGenerator {
    fn set_depth_limits(&mut self, min: f64, max: f64) -> Result<(), Error> {
        validate_limits(min, max)?;
        self.depth_limits = [min, max];
        Ok(())
    }

    fn set_timeline(&mut self, min: f64, max: f64) -> Result<(), Error> {
        validate_limits(min, max)?;
        self.timeline = [min, max];
        Ok(())
    }

    fn depth_limits(&self) -> [f64; 2] {
        self.depth_limits
    }

    fn timeline(&self) -> [f64; 2] {
        self.timeline
    }

    fn obtain_id(
        &mut self,
        lon: f64,
        lat: f64,
        depth: f64,
        time: f64,
    ) -> Result<ParticleId, Error> {
        let cell = self.cell_key(lon, lat, depth, time)?;

        // 同じセルの返却済み識別子を優先して再利用する
        if let Some(free) = self.released.get_mut(&cell)
            && let Some(sequence) = free.min()
        {
            free.remove(sequence);
            if free.is_empty() {
                self.released.remove(&cell);
            }

            let id = ParticleId::from_parts(cell, sequence);
            self.in_use.insert(id.raw());
            return Ok(id);
        }

        let counter = self.counters.entry(cell).or_insert(0);
        let sequence = *counter;
        if sequence > u32::MAX as u64 {
            return Err(Error::IdExhausted { cell });
        }
        *counter += 1;

        let id = ParticleId::from_parts(cell, sequence as u32);
        self.in_use.insert(id.raw());
        self.total_generated += 1;
        Ok(id)
    }

    fn release_id(&mut self, id: ParticleId) {
        if self.in_use.remove(id.raw()) {
            self.released
                .entry(id.cell())
                .or_default()
                .insert(id.sequence());
        } else {
            warn!(id = %id, "release of an id that is not in use");
        }
    }

    fn total_in_use(&self) -> u64 {
        self.in_use.len()
    }

    fn total_generated(&self) -> u64 {
        self.total_generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_configuration() {
        let generator = SpatioTemporalIdGenerator::new();
        assert_eq!(generator.depth_limits(), DEFAULT_DEPTH_LIMITS);
        assert_eq!(generator.timeline(), DEFAULT_TIMELINE);
    }

    #[test]
    fn test_same_cell_increments_sequence() {
        let mut generator = SpatioTemporalIdGenerator::new();

        let a = generator.obtain_id(135.5, 35.5, 10.0, 12.0).unwrap();
        let b = generator.obtain_id(135.5, 35.5, 10.0, 12.0).unwrap();

        assert_eq!(a.cell(), b.cell());
        assert_eq!(a.sequence(), 0);
        assert_eq!(b.sequence(), 1);
    }

    #[test]
    fn test_bins_reflect_position() {
        let mut generator = SpatioTemporalIdGenerator::new();

        // 東経135度 / 北緯35度 / 深度50m（範囲の中央） / 時刻120（範囲の中央）
        let id = generator.obtain_id(135.0, 35.0, 50.0, 120.0).unwrap();
        assert_eq!(id.lon_bin(), 315);
        assert_eq!(id.lat_bin(), 125);
        assert_eq!(id.depth_bin(), 64);
        assert_eq!(id.time_bin(), 128);
    }

    #[test]
    fn test_limit_values_map_to_last_bin() {
        let mut generator = SpatioTemporalIdGenerator::new();

        let id = generator.obtain_id(180.0, 90.0, 100.0, 240.0).unwrap();
        assert_eq!(id.lat_bin(), LAT_BINS - 1);
        assert_eq!(id.depth_bin(), DEPTH_BINS - 1);
        assert_eq!(id.time_bin(), TIME_BINS - 1);
    }

    #[test]
    fn test_longitude_wraps() {
        let mut generator = SpatioTemporalIdGenerator::new();

        // 経度190度は-170度と同じビンになる
        let a = generator.obtain_id(190.0, 0.0, 0.0, 0.0).unwrap();
        let b = generator.obtain_id(-170.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(a.lon_bin(), b.lon_bin());
    }

    #[test]
    fn test_out_of_range_errors() {
        let mut generator = SpatioTemporalIdGenerator::new();

        assert_eq!(
            generator.obtain_id(0.0, 95.0, 0.0, 0.0),
            Err(Error::LatitudeOutOfRange { latitude: 95.0 })
        );
        assert_eq!(
            generator.obtain_id(0.0, 0.0, 150.0, 0.0),
            Err(Error::DepthOutOfRange {
                depth: 150.0,
                min: 0.0,
                max: 100.0
            })
        );
        assert_eq!(
            generator.obtain_id(0.0, 0.0, 0.0, 241.0),
            Err(Error::TimeOutOfRange {
                time: 241.0,
                min: 0.0,
                max: 240.0
            })
        );
        assert!(generator.obtain_id(f64::NAN, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_limits_keep_previous_configuration() {
        let mut generator = SpatioTemporalIdGenerator::new();

        assert_eq!(
            generator.set_depth_limits(50.0, 50.0),
            Err(Error::InvalidLimits {
                min: 50.0,
                max: 50.0
            })
        );
        assert!(generator.set_timeline(f64::NAN, 10.0).is_err());

        // エラー時は既定値のまま
        assert_eq!(generator.depth_limits(), DEFAULT_DEPTH_LIMITS);
        assert_eq!(generator.timeline(), DEFAULT_TIMELINE);
    }

    #[test]
    fn test_release_and_reuse() {
        let mut generator = SpatioTemporalIdGenerator::new();

        let a = generator.obtain_id(135.0, 35.0, 10.0, 12.0).unwrap();
        let b = generator.obtain_id(135.0, 35.0, 10.0, 12.0).unwrap();
        assert_eq!(generator.total_in_use(), 2);

        generator.release_id(a);
        assert_eq!(generator.total_in_use(), 1);

        // 返却した識別子が優先的に再利用される
        let c = generator.obtain_id(135.0, 35.0, 10.0, 12.0).unwrap();
        assert_eq!(a, c);
        assert_ne!(b, c);

        // 再利用は新規発行数に数えない
        assert_eq!(generator.total_generated(), 2);
    }

    #[test]
    fn test_full_sequence_space_is_issued() {
        let mut generator = SpatioTemporalIdGenerator::new();
        let cell = generator.cell_key(135.0, 35.0, 10.0, 12.0).unwrap();

        // 最後のシーケンス番号まで発行できる
        generator.counters.insert(cell, u32::MAX as u64);
        let id = generator.obtain_id(135.0, 35.0, 10.0, 12.0).unwrap();
        assert_eq!(id.sequence(), u32::MAX);

        // 使い切った後はエラーになる
        assert_eq!(
            generator.obtain_id(135.0, 35.0, 10.0, 12.0),
            Err(Error::IdExhausted { cell })
        );
    }

    #[test]
    fn test_release_unknown_id_is_ignored() {
        let mut generator = SpatioTemporalIdGenerator::new();
        generator.release_id(ParticleId(12345));
        assert_eq!(generator.total_in_use(), 0);

        // 二重返却も無視される
        let id = generator.obtain_id(0.0, 0.0, 0.0, 0.0).unwrap();
        generator.release_id(id);
        generator.release_id(id);
        assert_eq!(generator.total_in_use(), 0);
    }

    #[test]
    fn test_reconfigured_limits_change_binning() {
        let mut generator = SpatioTemporalIdGenerator::new();
        generator.set_depth_limits(0.0, 1000.0).unwrap();

        // 深度50mは[0, 1000]の正規化では先頭側のビンに入る
        let id = generator.obtain_id(0.0, 0.0, 50.0, 0.0).unwrap();
        assert_eq!(id.depth_bin(), 6);
    }

    proptest! {
        /// 有効範囲内の任意の入力で、発行した識別子は互いに重複しない
        #[test]
        fn prop_obtained_ids_are_unique(
            inputs in proptest::collection::vec(
                (-180.0f64..180.0, -90.0f64..=90.0, 0.0f64..=100.0, 0.0f64..=240.0),
                1..200,
            )
        ) {
            let mut generator = SpatioTemporalIdGenerator::new();
            let mut seen = std::collections::HashSet::new();

            for (lon, lat, depth, time) in inputs {
                let id = generator.obtain_id(lon, lat, depth, time).unwrap();
                prop_assert!(seen.insert(id));
            }
        }

        /// デコードしたビンは常にレイアウトの範囲内に収まる
        #[test]
        fn prop_decoded_bins_in_range(
            lon in -180.0f64..180.0,
            lat in -90.0f64..=90.0,
            depth in 0.0f64..=100.0,
            time in 0.0f64..=240.0,
        ) {
            let mut generator = SpatioTemporalIdGenerator::new();
            let id = generator.obtain_id(lon, lat, depth, time).unwrap();

            prop_assert!(id.lon_bin() < LON_BINS);
            prop_assert!(id.lat_bin() < LAT_BINS);
            prop_assert!(id.depth_bin() < DEPTH_BINS);
            prop_assert!(id.time_bin() < TIME_BINS);
        }
    }
}
