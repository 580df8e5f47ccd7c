use std::path::PathBuf;

/// 既定の深度範囲（メートル）
///
/// 既定構成のサービスはこの範囲で深度成分を正規化する。
pub const DEFAULT_DEPTH_LIMITS: [f64; 2] = [0.0, 100.0];

/// 既定のタイムライン範囲（シミュレーション時間）
pub const DEFAULT_TIMELINE: [f64; 2] = [0.0, 240.0];

/// 経度ビン数（1度刻み）
pub const LON_BINS: u32 = 360;

/// 緯度ビン数（1度刻み）
pub const LAT_BINS: u32 = 180;

/// 深度ビン数（7bit）
pub const DEPTH_BINS: u32 = 128;

/// 時間ビン数（8bit）
pub const TIME_BINS: u32 = 256;

/// プロセス固有のキャッシュディレクトリを作成してパスを返す
///
/// システムの一時ディレクトリ配下にプロセスIDを付与して作成する。
/// すでに存在する場合はそのまま返す。
pub fn cache_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nagare-tools-{}", std::process::id()));
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// キャッシュディレクトリを削除する
///
/// 存在しない場合は何もしない。
pub fn cleanup_cache_dir() {
    let dir = cache_dir();
    if dir.exists() {
        let _ = std::fs::remove_dir_all(&dir);
    }
}
