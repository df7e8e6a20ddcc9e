//! 金额工具模块
//!
//! 所有业务金额以分 (i64) 表示，浮点只出现在展示/解析边界。

/// 将欧元金额转换为分 (四舍五入)
///
/// # Examples
///
/// ```
/// use shared::money::euros_to_cents;
///
/// assert_eq!(euros_to_cents(12.50), 1250);
/// assert_eq!(euros_to_cents(0.01), 1);
/// ```
pub fn euros_to_cents(euros: f64) -> i64 {
    (euros * 100.0).round() as i64
}

/// 将分转换为欧元
pub fn cents_to_euros(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Line total: unit price in cents times a quantity.
pub fn line_total_cents(price_cents: i64, quantity: u32) -> i64 {
    price_cents.saturating_mul(i64::from(quantity))
}

/// 格式化分为货币字符串 (欧元)
///
/// # Examples
///
/// ```
/// use shared::money::format_cents;
///
/// assert_eq!(format_cents(1250), "12.50€");
/// assert_eq!(format_cents(5), "0.05€");
/// ```
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}€", sign, abs / 100, abs % 100)
}
