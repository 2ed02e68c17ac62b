//! 状态码分组

/// 取错误码十进制表示的前三位作为状态码
///
/// 不足三位时返回 0。仅用于粗粒度分组，解析失败同样返回 0。
///
/// ```
/// use statuserr::runtime::status_code;
///
/// assert_eq!(status_code(404001), 404);
/// assert_eq!(status_code(42), 0);
/// assert_eq!(status_code(999), 999);
/// ```
pub fn status_code(code: i64) -> i64 {
    let digits = code.to_string();
    if digits.len() < 3 {
        return 0;
    }
    digits[..3].parse().unwrap_or(0)
}
