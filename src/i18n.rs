// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）；不支持的代码回退到 "en"
pub fn set_locale(locale: &str) {
    let locale = if SUPPORTED_LOCALES.contains(&locale) {
        locale
    } else {
        tracing::warn!(locale, "不支持的语言，回退到 en");
        "en"
    };
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use inventory_dashboard::i18n::t;
/// let msg = t("shell.products_loading");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use inventory_dashboard::i18n::t_with_args;
/// let msg = t_with_args("transfer.exceeds_stock", &[("stock", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
