//! 实体标识和管理
//!
//! 采用生成式ID设计：编辑实体时保留 `id` 并递增 `generation`，
//! 旧实例保持不变，从而实体在构造后始终不可变。

use crate::geometry::{Arc, Circle, Ellipse, Line};
use crate::interaction::{self, EntityInteraction};
use crate::math::BoundingBox2;
use crate::meta::{MetaType, MetaTypes};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// 全局实体ID生成器
static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 实体唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    /// 唯一ID
    pub id: u64,
    /// 代数（用于区分同一实体编辑前后的不同版本）
    pub generation: u32,
}

impl EntityId {
    /// 创建新的实体ID
    pub fn new() -> Self {
        Self {
            id: ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    /// 从指定值创建
    pub fn from_raw(id: u64, generation: u32) -> Self {
        Self { id, generation }
    }

    /// 同一实体的下一版本
    pub fn next_generation(&self) -> Self {
        Self {
            id: self.id,
            generation: self.generation.wrapping_add(1),
        }
    }

    /// 是否指向同一实体（忽略代数）
    pub fn same_entity(&self, other: &EntityId) -> bool {
        self.id == other.id
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// 实体类型标签
///
/// 声明顺序即双分派时的规范顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Line,
    Circle,
    Arc,
    Ellipse,
}

impl EntityType {
    /// 全部实体类型
    pub const ALL: [EntityType; 4] = [
        EntityType::Line,
        EntityType::Circle,
        EntityType::Arc,
        EntityType::Ellipse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Line => "Line",
            EntityType::Circle => "Circle",
            EntityType::Arc => "Arc",
            EntityType::Ellipse => "Ellipse",
        }
    }
}

/// 实体的几何数据（封闭的图元集合）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EntityKind {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
}

impl EntityKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Line(_) => EntityType::Line,
            EntityKind::Circle(_) => EntityType::Circle,
            EntityKind::Arc(_) => EntityType::Arc,
            EntityKind::Ellipse(_) => EntityType::Ellipse,
        }
    }

    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            EntityKind::Line(l) => l.bounding_box(),
            EntityKind::Circle(c) => c.bounding_box(),
            EntityKind::Arc(a) => a.bounding_box(),
            EntityKind::Ellipse(e) => e.bounding_box(),
        }
    }
}

impl From<Line> for EntityKind {
    fn from(line: Line) -> Self {
        EntityKind::Line(line)
    }
}

impl From<Circle> for EntityKind {
    fn from(circle: Circle) -> Self {
        EntityKind::Circle(circle)
    }
}

impl From<Arc> for EntityKind {
    fn from(arc: Arc) -> Self {
        EntityKind::Arc(arc)
    }
}

impl From<Ellipse> for EntityKind {
    fn from(ellipse: Ellipse) -> Self {
        EntityKind::Ellipse(ellipse)
    }
}

/// CAD实体
///
/// 一个实体包含稳定标识、几何数据和有序的元属性列表。
/// 构造后不可变，编辑通过 `with_*` 返回新实例。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadEntity {
    id: EntityId,
    kind: EntityKind,
    metas: MetaTypes,
}

impl CadEntity {
    /// 创建新实体
    pub fn new(kind: impl Into<EntityKind>) -> Self {
        Self {
            id: EntityId::new(),
            kind: kind.into(),
            metas: MetaTypes::new(),
        }
    }

    /// 创建带元属性的新实体
    pub fn with_metas(kind: impl Into<EntityKind>, metas: MetaTypes) -> Self {
        Self {
            id: EntityId::new(),
            kind: kind.into(),
            metas,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn metas(&self) -> &MetaTypes {
        &self.metas
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    /// 获取包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        self.kind.bounding_box()
    }

    /// 替换几何后得到的新版本
    pub fn with_geometry(&self, kind: impl Into<EntityKind>) -> Self {
        Self {
            id: self.id.next_generation(),
            kind: kind.into(),
            metas: self.metas.clone(),
        }
    }

    /// 加入（或覆盖）元属性后得到的新版本
    pub fn with_meta(&self, meta: MetaType) -> Self {
        Self {
            id: self.id.next_generation(),
            kind: self.kind.clone(),
            metas: self.metas.clone().with(meta),
        }
    }

    /// 与另一实体进行交互（双分派入口）
    pub fn accept<I: EntityInteraction>(&self, other: &CadEntity, interaction: &mut I) -> I::Output {
        interaction::accept(&self.kind, &other.kind, interaction)
    }
}
