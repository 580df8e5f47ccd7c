use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// ログ出力を初期化する
///
/// `RUST_LOG` 環境変数でフィルタを指定できる（未指定時は `info`）。
/// 複数回呼んでも二度目以降は何もしない。
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // テストハーネス等が先にsubscriberを登録している場合は失敗を無視する
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
