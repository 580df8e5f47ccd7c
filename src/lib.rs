/// 物理量の単位変換（メートル系と度系）。
mod converters;

/// 発生し得るすべてのエラーを`enum` 型として定義・集約。
mod error;

/// 識別子生成の戦略とサービス。
mod id_generator;

/// 線形補間の基底関数。
mod interpolation;

/// ログ出力の初期化。
pub mod loggers;

/// プロセス全体で共有する定数とパス。
mod statics;

/// 階層構造の経過時間計測。
mod timer;

pub use roaring::RoaringTreemap;

pub use converters::{
    Geographic, GeographicPolar, GeographicPolarSquare, GeographicSquare, PassThrough,
    UnitConverter,
};
pub use error::Error;
pub use id_generator::{
    GenerateIdService, IdGenerator, ParticleId, SequentialIdGenerator, SpatioTemporalIdGenerator,
};
pub use interpolation::{nearest_index, phi1d_lin, phi2d_lin, phi3d_lin};
pub use statics::{
    DEFAULT_DEPTH_LIMITS, DEFAULT_TIMELINE, DEPTH_BINS, LAT_BINS, LON_BINS, TIME_BINS, cache_dir,
    cleanup_cache_dir,
};
pub use timer::Timer;
