//! # 材料标识
//!
//! `(material, structure)` 组合键，例如 `("GaN", "zb")`。
//!
//! ## 依赖关系
//! - 被 `db/` 所有数据库使用

/// 材料 + 晶体结构组合键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialKey {
    /// 材料名称 (e.g. "GaN")
    pub material: String,
    /// 结构/多型标签 (e.g. "zb", "wz")
    pub structure: String,
}

impl MaterialKey {
    pub fn new(material: impl Into<String>, structure: impl Into<String>) -> Self {
        MaterialKey {
            material: material.into(),
            structure: structure.into(),
        }
    }
}

impl std::fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.material, self.structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![
            MaterialKey::new("GaN", "zb"),
            MaterialKey::new("AlAs", "zb"),
            MaterialKey::new("GaN", "wz"),
        ];
        keys.sort();
        assert_eq!(keys[0], MaterialKey::new("AlAs", "zb"));
        assert_eq!(keys[1], MaterialKey::new("GaN", "wz"));
        assert_eq!(keys[2].to_string(), "GaN (zb)");
    }
}
