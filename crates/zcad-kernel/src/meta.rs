//! 实体元属性定义
//!
//! 元属性（MetaType）是附加在实体上的显示属性：颜色、线宽、图层。
//! 几何内核只负责保存和按类型查找，不解释其含义。

use serde::Serialize;

/// RGBA颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 从十六进制值创建（如 0xFF0000 表示红色）
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 255,
        }
    }

    // 预定义颜色（AutoCAD ACI颜色兼容）
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
}

/// 线宽（毫米）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineWidth(pub f64);

impl LineWidth {
    /// 获取像素线宽（假设96dpi）
    pub fn to_pixels(&self) -> f64 {
        self.0 * 96.0 / 25.4
    }
}

/// 元属性种类，用于按类型查找
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetaKind {
    Color,
    LineWidth,
    Layer,
}

/// 元属性
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetaType {
    Color(Color),
    LineWidth(LineWidth),
    /// 所属图层名称
    Layer(String),
}

impl MetaType {
    pub fn kind(&self) -> MetaKind {
        match self {
            MetaType::Color(_) => MetaKind::Color,
            MetaType::LineWidth(_) => MetaKind::LineWidth,
            MetaType::Layer(_) => MetaKind::Layer,
        }
    }
}

/// 有序的元属性列表
///
/// 保持插入顺序；同一种类的属性后写入者覆盖先写入者，覆盖时保留原位置。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaTypes {
    items: Vec<MetaType>,
}

impl MetaTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 返回加入（或覆盖）指定属性后的新列表
    pub fn with(mut self, meta: MetaType) -> Self {
        self.insert(meta);
        self
    }

    fn insert(&mut self, meta: MetaType) {
        match self.items.iter_mut().find(|m| m.kind() == meta.kind()) {
            Some(slot) => *slot = meta,
            None => self.items.push(meta),
        }
    }

    /// 按种类查找
    pub fn get(&self, kind: MetaKind) -> Option<&MetaType> {
        self.items.iter().find(|m| m.kind() == kind)
    }

    pub fn color(&self) -> Option<Color> {
        match self.get(MetaKind::Color) {
            Some(MetaType::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn line_width(&self) -> Option<LineWidth> {
        match self.get(MetaKind::LineWidth) {
            Some(MetaType::LineWidth(w)) => Some(*w),
            _ => None,
        }
    }

    pub fn layer(&self) -> Option<&str> {
        match self.get(MetaKind::Layer) {
            Some(MetaType::Layer(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetaType> {
        self.items.iter()
    }
}

impl FromIterator<MetaType> for MetaTypes {
    fn from_iter<I: IntoIterator<Item = MetaType>>(iter: I) -> Self {
        let mut metas = MetaTypes::new();
        for meta in iter {
            metas.insert(meta);
        }
        metas
    }
}
