//! 階層構造の経過時間計測モジュール
//!
//! シミュレーションの各フェーズの所要時間を木構造で集計し、
//! ルートに対する割合つきでレポートする。

use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// 名前つきタイマー
///
/// `start` / `stop` を繰り返すと経過時間が累積される。
/// 子タイマーは名前で取得し、存在しなければ作成される。
#[derive(Debug)]
pub struct Timer {
    name: String,
    elapsed: Duration,
    started: Option<Instant>,
    children: Vec<Timer>,
}

impl Timer {
    /// 新しいタイマーを作成する（停止状態）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elapsed: Duration::ZERO,
            started: None,
            children: Vec::new(),
        }
    }

    /// 計測を開始する
    ///
    /// すでに開始済みの場合は何もしない。
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// 計測を停止し、経過時間を累積する
    ///
    /// 開始していない場合は何もしない。
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    /// 計測中かどうかを返す
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// 累積経過時間を返す
    ///
    /// 計測中の場合は現在までの経過を含める。
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => self.elapsed + started.elapsed(),
            None => self.elapsed,
        }
    }

    /// タイマーの名前を返す
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 名前で子タイマーを取得する
    ///
    /// 存在しない場合は新規作成して返す。
    pub fn child(&mut self, name: &str) -> &mut Timer {
        if let Some(i) = self.children.iter().position(|c| c.name == name) {
            return &mut self.children[i];
        }
        self.children.push(Timer::new(name));
        self.children.last_mut().expect("child was just pushed")
    }

    /// 子タイマーの一覧を返す
    pub fn children(&self) -> &[Timer] {
        &self.children
    }

    /// 計測結果を木構造の文字列としてレポートする
    ///
    /// 各ノードにルートの経過時間に対する割合を併記する。
    pub fn report(&self) -> String {
        let root_secs = self.elapsed().as_secs_f64();
        let mut out = String::new();
        self.write_node(&mut out, 0, root_secs);
        out
    }

    fn write_node(&self, out: &mut String, depth: usize, root_secs: f64) {
        let secs = self.elapsed().as_secs_f64();
        let percent = if root_secs > 0.0 {
            secs / root_secs * 100.0
        } else {
            0.0
        };

        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}({percent:5.1}%) {}: {secs:.6} s", self.name);

        for chi in &self.children {
            chi.write_node(out, depth + 1, root_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_start_stop_accumulates() {
        let mut timer = Timer::new("root");
        timer.start();
        sleep(Duration::from_millis(5));
        timer.stop();

        let first = timer.elapsed();
        assert!(first >= Duration::from_millis(5));

        // 2回目の計測で累積される
        timer.start();
        sleep(Duration::from_millis(5));
        timer.stop();
        assert!(timer.elapsed() > first);
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut timer = Timer::new("t");
        timer.start();
        timer.start();
        assert!(timer.is_running());
        timer.stop();
        assert!(!timer.is_running());

        // 開始していない状態のstopも無視される
        timer.stop();
    }

    #[test]
    fn test_child_created_on_demand() {
        let mut root = Timer::new("root");
        root.child("io").start();
        root.child("io").stop();
        root.child("compute");

        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].name(), "io");
    }

    #[test]
    fn test_report_contains_tree() {
        let mut root = Timer::new("simulation");
        root.start();
        let io = root.child("io");
        io.start();
        sleep(Duration::from_millis(2));
        io.stop();
        root.stop();

        let report = root.report();
        assert!(report.contains("simulation"));
        assert!(report.contains("io"));
        // 子はインデントされる
        assert!(report.contains("\n  "));
    }

    #[test]
    fn test_report_zero_elapsed() {
        let timer = Timer::new("empty");
        let report = timer.report();
        assert!(report.contains("(  0.0%)"));
    }
}
