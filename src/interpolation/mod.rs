//! 線形補間の基底関数モジュール
//!
//! 単位区間・単位正方形・単位立方体上の頂点重みを計算する。
//! 重みは常に総和1になる（partition of unity）。

/// 1次元線形補間の重みを返す
///
/// # 引数
/// * `xsi` - 単位区間上の局所座標 0.0..=1.0
///
/// # 戻り値
/// 両端点の重み `[1 - xsi, xsi]`
pub fn phi1d_lin(xsi: f64) -> [f64; 2] {
    [1.0 - xsi, xsi]
}

/// 2次元双線形補間の重みを返す
///
/// 頂点は (xsi, eta) の辞書順で (0,0), (1,0), (0,1), (1,1)。
pub fn phi2d_lin(xsi: f64, eta: f64) -> [f64; 4] {
    [
        (1.0 - xsi) * (1.0 - eta),
        xsi * (1.0 - eta),
        (1.0 - xsi) * eta,
        xsi * eta,
    ]
}

/// 3次元三線形補間の重みを返す
///
/// 頂点は (xsi, eta, zeta) の辞書順。zeta=0 の面4頂点、zeta=1 の面4頂点の順。
pub fn phi3d_lin(xsi: f64, eta: f64, zeta: f64) -> [f64; 8] {
    [
        (1.0 - xsi) * (1.0 - eta) * (1.0 - zeta),
        xsi * (1.0 - eta) * (1.0 - zeta),
        (1.0 - xsi) * eta * (1.0 - zeta),
        xsi * eta * (1.0 - zeta),
        (1.0 - xsi) * (1.0 - eta) * zeta,
        xsi * (1.0 - eta) * zeta,
        (1.0 - xsi) * eta * zeta,
        xsi * eta * zeta,
    ]
}

/// 最近傍補間のインデックスを返す
///
/// 局所座標 0.5 以上で上側の頂点を選ぶ。
pub fn nearest_index(xsi: f64) -> usize {
    if xsi < 0.5 { 0 } else { 1 }
}
