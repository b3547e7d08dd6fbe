// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持波兰语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "pl";

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["pl", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"pl" 或 "en"）；不支持的代码回退到默认语言
pub fn set_locale(locale: &str) {
    let locale = locale.trim();
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, fallback = DEFAULT_LOCALE, "不支持的语言，使用默认语言");
        rust_i18n::set_locale(DEFAULT_LOCALE);
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use welding_time::i18n::t;
/// let msg = t("report.grand_total");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use welding_time::i18n::t_with_args;
/// let msg = t_with_args("validation.invalid_code", &[("value", "12-34")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("pl");
        assert_eq!(current_locale(), "pl");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("pl");
    }

    #[test]
    fn test_unsupported_locale_falls_back() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("de");
        assert_eq!(current_locale(), DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("pl");
        assert_eq!(t("status.within_norm"), "W normie (odchylenie ≤ 10%)");

        set_locale("en");
        assert_eq!(t("report.grand_total"), "TOTAL WELDING TIME");

        set_locale("pl");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("pl");
        let msg = t_with_args("validation.invalid_code", &[("value", "12-34")]);
        assert!(msg.contains("12-34"));
        assert!(msg.contains("xxx-xxxx-xxx"));

        set_locale("en");
        let msg = t_with_args("validation.unknown_group", &[("value", "Kubki")]);
        assert_eq!(msg, "Group 'Kubki' not found.");

        set_locale("pl");
    }
}
