// 批量客户端的文件日志
//
// 日志按大小轮转写入 `LogConfig` 指定的目录；异步写入的缓冲在 shutdown 时落盘

use crate::config::LogConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::sync::Mutex;

static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 按配置启动文件日志
///
/// 已经启动过时直接返回，`log` 的全局记录器在进程内只能设置一次
///
/// ```no_run
/// use graphbatch::config::LogConfig;
/// use graphbatch::utils::logging;
///
/// logging::init(&LogConfig::default()).expect("日志初始化失败");
/// log::info!("批量客户端已启动");
/// logging::shutdown();
/// ```
pub fn init(config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut guard = LOGGER_HANDLE
        .lock()
        .map_err(|_| "日志句柄锁已损坏")?;
    if guard.is_some() {
        return Ok(());
    }

    let spec = FileSpec::default()
        .directory(&config.dir)
        .basename(&config.file);
    let rotation = Criterion::Size(config.max_file_size);

    let handle = Logger::try_with_str(&config.level)?
        .log_to_file(spec)
        .rotate(rotation, Naming::Numbers, Cleanup::KeepLogFiles(config.max_files))
        .write_mode(WriteMode::Async)
        .append()
        .start()?;
    *guard = Some(handle);
    drop(guard);

    log::info!(
        "日志写入 {}/{} (级别 {}, 保留 {} 个文件)",
        config.dir,
        config.file,
        config.level,
        config.max_files
    );
    Ok(())
}

/// 落盘并释放日志句柄
pub fn shutdown() {
    let handle = LOGGER_HANDLE.lock().ok().and_then(|mut guard| guard.take());
    if let Some(handle) = handle {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE
        .lock()
        .map(|guard| guard.is_some())
        .unwrap_or(false)
}
