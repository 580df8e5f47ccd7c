use roaring::RoaringTreemap;
use tracing::warn;

use crate::{
    error::Error,
    id_generator::{IdGenerator, ParticleId, validate_limits},
    statics::{DEFAULT_DEPTH_LIMITS, DEFAULT_TIMELINE},
};

/// 連番型の識別子生成器
///
/// 位置と時刻を無視して昇順の識別子を発行する。返却された識別子は
/// 最小のものから再利用される。範囲設定は保持するだけで発行には使わない。
#[derive(Debug)]
pub struct SequentialIdGenerator {
    depth_limits: [f64; 2],
    timeline: [f64; 2],
    /// 次に発行する値。64bit空間を使い切るとNone
    next: Option<u64>,
    released: RoaringTreemap,
    in_use: RoaringTreemap,
    total_generated: u64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self {
            depth_limits: DEFAULT_DEPTH_LIMITS,
            timeline: DEFAULT_TIMELINE,
            next: Some(0),
            released: RoaringTreemap::new(),
            in_use: RoaringTreemap::new(),
            total_generated: 0,
        }
    }
}

impl SequentialIdGenerator {
    /// 既定の範囲設定で生成器を作成する
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
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
        _lon: f64,
        _lat: f64,
        _depth: f64,
        _time: f64,
    ) -> Result<ParticleId, Error> {
        // 返却済みの最小値を優先して再利用する
        if let Some(value) = self.released.min() {
            self.released.remove(value);
            self.in_use.insert(value);
            return Ok(ParticleId(value));
        }

        let Some(value) = self.next else {
            return Err(Error::IdPoolExhausted);
        };

        let id = ParticleId(value);
        self.next = value.checked_add(1);
        self.in_use.insert(id.raw());
        self.total_generated += 1;
        Ok(id)
    }

    fn release_id(&mut self, id: ParticleId) {
        if self.in_use.remove(id.raw()) {
            self.released.insert(id.raw());
        } else {
            warn!(id = id.raw(), "release of an id that is not in use");
        }
    }

    fn total_in_use(&self) -> u64 {
        self.in_use.len()
    }

    fn total_generated(&self) -> u64 {
        self.total_generated
    }
}
