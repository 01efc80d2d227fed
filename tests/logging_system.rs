//! 日志系统集成测试.
//!
//! tracing 全局订阅器在一个进程内只能安装一次, 因此所有检查放在同一个测试中.

use std::fs;

#[test]
fn test_日志初始化创建文件且只能初始化一次() {
    let dir = tempfile::tempdir().unwrap();
    bian::logging::init_in(dir.path(), "bian-test", 1).unwrap();
    tracing::info!("日志系统已就绪");

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert!(
        names
            .iter()
            .any(|n| n.starts_with("bian-test.") && n.ends_with(".log")),
        "{names:?}"
    );

    assert!(bian::logging::init_in(dir.path(), "bian-test", 0).is_err());
}
