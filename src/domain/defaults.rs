// ==========================================
// 焊接工时计算系统 - 内置默认数据
// ==========================================
// 7 种规范焊接方法 + 默认工时表
// 5 个默认产品组
// ==========================================

use crate::domain::types::SizeBracket;

/// 规范焊接方法名称（显示顺序）
pub const CANONICAL_METHODS: [&str; 7] = [
    "HF Duży (ZEMAT)",
    "HF Mały (WOLDAN)",
    "Gorące Powietrze (MILLER)",
    "Gorące Powietrze (Ręcznie)",
    "Gorące Powietrze (Zgrzewarka jezdna)",
    "Gorące Powietrze (ASATECH)",
    "Gorący Klin (SEAMTEC)",
];

/// 默认产品组名称
pub const DEFAULT_GROUPS: [&str; 5] = [
    "Koła",
    "Box",
    "Płachty",
    "Nieregularne Drobne",
    "Nieregularne Duże",
];

/// 规范方法的默认工时表
///
/// # 返回
/// - Some([(区间, 人数, 分钟/米); 4]): 规范方法
/// - None: 非规范方法（空表起步）
pub fn default_time_table(method_name: &str) -> Option<[(SizeBracket, u32, f64); 4]> {
    use SizeBracket::*;

    let table = match method_name {
        "HF Duży (ZEMAT)" | "HF Mały (WOLDAN)" => [
            (UpTo2, 1, 2.0),
            (From2To20, 1, 3.0),
            (From20To60, 2, 2.0),
            (Above60, 3, 3.0),
        ],
        "Gorące Powietrze (MILLER)" | "Gorący Klin (SEAMTEC)" => [
            (UpTo2, 1, 1.5),
            (From2To20, 2, 1.5),
            (From20To60, 3, 1.5),
            (Above60, 4, 2.0),
        ],
        "Gorące Powietrze (Ręcznie)" => [
            (UpTo2, 1, 3.0),
            (From2To20, 1, 5.0),
            (From20To60, 2, 4.0),
            (Above60, 3, 5.0),
        ],
        "Gorące Powietrze (Zgrzewarka jezdna)" | "Gorące Powietrze (ASATECH)" => [
            (UpTo2, 1, 1.5),
            (From2To20, 2, 2.0),
            (From20To60, 3, 3.0),
            (Above60, 4, 4.0),
        ],
        _ => return None,
    };

    Some(table)
}

/// 是否为规范方法
pub fn is_canonical_method(method_name: &str) -> bool {
    CANONICAL_METHODS.contains(&method_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_method_has_full_table() {
        for name in CANONICAL_METHODS {
            let table = default_time_table(name).expect("canonical method must have a table");
            let brackets: Vec<SizeBracket> = table.iter().map(|(b, _, _)| *b).collect();
            assert_eq!(brackets, SizeBracket::ALL.to_vec(), "{}", name);
        }
    }

    #[test]
    fn test_unknown_method_has_no_table() {
        assert!(default_time_table("Ultradźwięki").is_none());
        assert!(!is_canonical_method("Ultradźwięki"));
        assert!(is_canonical_method("Gorący Klin (SEAMTEC)"));
    }
}
