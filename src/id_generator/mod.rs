use core::fmt;
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub mod sequential;
pub mod spatio_temporal;

pub use sequential::SequentialIdGenerator;
pub use spatio_temporal::SpatioTemporalIdGenerator;

/// 粒子に割り当てる64bitの識別子
///
/// 上位32bitが時空間セルキー（経度9bit / 緯度8bit / 深度7bit / 時間8bit）、
/// 下位32bitがセル内のシーケンス番号。
/// `SequentialIdGenerator` が生成した場合は単純な連番として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}_{}",
            self.lon_bin(),
            self.lat_bin(),
            self.depth_bin(),
            self.time_bin(),
            self.sequence()
        )
    }
}

impl ParticleId {
    /// セルキーとシーケンス番号から識別子を組み立てる
    pub fn from_parts(cell: u32, sequence: u32) -> Self {
        Self(((cell as u64) << 32) | sequence as u64)
    }

    /// 生の64bit値を返す
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// 上位32bitのセルキーを返す
    pub fn cell(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// 下位32bitのシーケンス番号を返す
    pub fn sequence(&self) -> u32 {
        self.0 as u32
    }

    /// 経度ビン（0..=359）を返す
    pub fn lon_bin(&self) -> u32 {
        (self.cell() >> 23) & 0x1FF
    }

    /// 緯度ビン（0..=179）を返す
    pub fn lat_bin(&self) -> u32 {
        (self.cell() >> 15) & 0xFF
    }

    /// 深度ビン（0..=127）を返す
    pub fn depth_bin(&self) -> u32 {
        (self.cell() >> 8) & 0x7F
    }

    /// 時間ビン（0..=255）を返す
    pub fn time_bin(&self) -> u32 {
        self.cell() & 0xFF
    }
}

/// 識別子生成戦略のTrait
///
/// 時空間エンコード型と連番型を同じ窓口で差し替えられるようにする。
pub trait IdGenerator {
    /// 深度範囲を設定する
    ///
    /// # エラー
    /// `min < max` でない、または有限値でない場合にエラーを返す。
    /// エラー時は既存の設定を変更しない。
    fn set_depth_limits(&mut self, min: f64, max: f64) -> Result<(), Error>;

    /// タイムライン範囲を設定する
    ///
    /// 契約は `set_depth_limits` と同じ。
    fn set_timeline(&mut self, min: f64, max: f64) -> Result<(), Error>;

    /// 設定済みの深度範囲を返す
    fn depth_limits(&self) -> [f64; 2];

    /// 設定済みのタイムライン範囲を返す
    fn timeline(&self) -> [f64; 2];

    /// 位置と時刻に対して次の識別子を発行する
    fn obtain_id(&mut self, lon: f64, lat: f64, depth: f64, time: f64)
    -> Result<ParticleId, Error>;

    /// 識別子を返却し、再利用できるようにする
    fn release_id(&mut self, id: ParticleId);

    /// 発行済みで未返却の識別子数を返す
    fn total_in_use(&self) -> u64;

    /// これまでに新規発行した識別子数を返す（再利用は含まない）
    fn total_generated(&self) -> u64;
}

/// 範囲設定値の検証
pub(crate) fn validate_limits(min: f64, max: f64) -> Result<(), Error> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(Error::InvalidLimits { min, max })
    }
}

/// 識別子生成サービス
///
/// 生成戦略を `Mutex` で包み、1つのインスタンスを複数スレッドで
/// 共有できるようにするラッパー。利用側が `Arc` に入れて持ち回る。
#[derive(Debug)]
pub struct GenerateIdService<G: IdGenerator> {
    inner: Mutex<G>,
}

impl<G: IdGenerator + Default> Default for GenerateIdService<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

impl<G: IdGenerator> GenerateIdService<G> {
    /// 戦略を指定してサービスを作成する
    pub fn new(generator: G) -> Self {
        Self {
            inner: Mutex::new(generator),
        }
    }

    /// ラップしている戦略を取り出す
    pub fn into_inner(self) -> G {
        match self.inner.into_inner() {
            Ok(generator) => generator,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // 他スレッドのパニックで設定値が壊れることはないため、
    // poisonされたロックも回復して続行する
    fn lock(&self) -> MutexGuard<'_, G> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 深度範囲を設定する
    pub fn set_depth_limits(&self, min: f64, max: f64) -> Result<(), Error> {
        self.lock().set_depth_limits(min, max)
    }

    /// タイムライン範囲を設定する
    pub fn set_timeline(&self, min: f64, max: f64) -> Result<(), Error> {
        self.lock().set_timeline(min, max)
    }

    /// 設定済みの深度範囲を返す
    pub fn depth_limits(&self) -> [f64; 2] {
        self.lock().depth_limits()
    }

    /// 設定済みのタイムライン範囲を返す
    pub fn timeline(&self) -> [f64; 2] {
        self.lock().timeline()
    }

    /// 位置と時刻に対して次の識別子を発行する
    pub fn obtain_id(&self, lon: f64, lat: f64, depth: f64, time: f64) -> Result<ParticleId, Error> {
        self.lock().obtain_id(lon, lat, depth, time)
    }

    /// 識別子を返却する
    pub fn release_id(&self, id: ParticleId) {
        self.lock().release_id(id)
    }

    /// 発行済みで未返却の識別子数を返す
    pub fn total_in_use(&self) -> u64 {
        self.lock().total_in_use()
    }

    /// これまでに新規発行した識別子数を返す
    pub fn total_generated(&self) -> u64 {
        self.lock().total_generated()
    }
}
