//! 物理量の単位変換モジュール
//!
//! メートル系で与えられる速度・拡散係数などを、緯度経度（度）系の
//! シミュレーション空間で扱うための変換を提供する。

/// 1度あたりのメートル数（子午線方向）
const METERS_PER_DEGREE: f64 = 1852.0 * 60.0;

/// 単位変換のTrait
///
/// `to_target` はソース単位（メートル系）からターゲット単位（度系）への変換、
/// `to_source` はその逆変換を行う。変換係数が位置に依存するため、
/// 変換対象の値に加えて経度・緯度・深度を受け取る。
pub trait UnitConverter {
    /// ソース単位からターゲット単位へ変換する
    ///
    /// # 引数
    /// * `value` - 変換する値
    /// * `lon` - 経度（度）
    /// * `lat` - 緯度（度）
    /// * `depth` - 深度（メートル）
    fn to_target(&self, value: f64, lon: f64, lat: f64, depth: f64) -> f64;

    /// ターゲット単位からソース単位へ変換する
    fn to_source(&self, value: f64, lon: f64, lat: f64, depth: f64) -> f64;
}

/// 変換を行わない恒等変換
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl UnitConverter for PassThrough {
    fn to_target(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value
    }

    fn to_source(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value
    }
}

/// メートルと度の変換（子午線方向）
///
/// 緯度方向の距離は位置に依存しないため、定数係数で変換する。
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl UnitConverter for Geographic {
    fn to_target(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value / METERS_PER_DEGREE
    }

    fn to_source(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value * METERS_PER_DEGREE
    }
}

/// メートルと度の変換（緯線方向）
///
/// 経度方向の距離は緯度に応じて縮むため、cos(緯度)で補正する。
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicPolar;

impl UnitConverter for GeographicPolar {
    fn to_target(&self, value: f64, _lon: f64, lat: f64, _depth: f64) -> f64 {
        value / METERS_PER_DEGREE / lat.to_radians().cos()
    }

    fn to_source(&self, value: f64, _lon: f64, lat: f64, _depth: f64) -> f64 {
        value * METERS_PER_DEGREE * lat.to_radians().cos()
    }
}

/// 二乗量（拡散係数など）のメートルと度の変換（子午線方向）
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicSquare;

impl UnitConverter for GeographicSquare {
    fn to_target(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value / (METERS_PER_DEGREE * METERS_PER_DEGREE)
    }

    fn to_source(&self, value: f64, _lon: f64, _lat: f64, _depth: f64) -> f64 {
        value * (METERS_PER_DEGREE * METERS_PER_DEGREE)
    }
}

/// 二乗量のメートルと度の変換（緯線方向）
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicPolarSquare;

impl UnitConverter for GeographicPolarSquare {
    fn to_target(&self, value: f64, _lon: f64, lat: f64, _depth: f64) -> f64 {
        let cos_lat = lat.to_radians().cos();
        value / (METERS_PER_DEGREE * METERS_PER_DEGREE * cos_lat * cos_lat)
    }

    fn to_source(&self, value: f64, _lon: f64, lat: f64, _depth: f64) -> f64 {
        let cos_lat = lat.to_radians().cos();
        value * (METERS_PER_DEGREE * METERS_PER_DEGREE * cos_lat * cos_lat)
    }
}
