//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use graphbatch::graph::{Method, Operation};

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言操作的方法与目标地址
pub fn assert_op(op: &Operation, method: Method, to: &str) {
    assert_eq!(op.method, method, "操作 {} 的方法不匹配", op.id);
    assert_eq!(op.to.to_string(), to, "操作 {} 的目标地址不匹配", op.id);
}

/// 断言每个操作的 ID 等于其在队列中的位置
pub fn assert_positions(ops: &[Operation]) {
    for (index, op) in ops.iter().enumerate() {
        assert_eq!(op.id, index, "操作 ID 应等于其位置");
    }
}
