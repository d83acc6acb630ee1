//! ZCAD 实体几何内核
//!
//! 提供2D CAD图元、对象捕捉查询以及实体之间的交互操作。
//!
//! # 架构设计
//!
//! - `CadEntity`: 稳定ID + 几何数据 + 有序元属性，构造后不可变
//! - `EntityKind`: 封闭的图元集合（线段、圆、圆弧、椭圆）
//! - `Snapable`: 捕捉点与路径最近点查询
//! - `EntityInteraction`: 按实体类型对进行双分派（求交、修剪）
//!
//! # 示例
//!
//! ```rust
//! use zcad_kernel::prelude::*;
//!
//! let a: EntityKind = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)).unwrap().into();
//! let b: EntityKind = Line::new(Point2::new(5.0, -5.0), Point2::new(5.0, 5.0)).unwrap().into();
//!
//! let hits = intersect(&a, &b);
//! assert_eq!(hits.points().len(), 1);
//! ```

pub mod entity;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod math;
pub mod meta;
pub mod snap;
pub mod store;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::entity::{CadEntity, EntityId, EntityKind, EntityType};
    pub use crate::error::GeometryError;
    pub use crate::geometry::{Arc, Circle, Ellipse, Line};
    pub use crate::interaction::{
        accept, intersect, EntityInteraction, Intersection, IntersectionResult, PairOrder, Trim,
        TrimResult,
    };
    pub use crate::math::{BoundingBox2, CoordinateExt, Point2, Vector2, EPSILON};
    pub use crate::meta::{Color, LineWidth, MetaKind, MetaType, MetaTypes};
    pub use crate::snap::{EntityCoordinate, SnapConfig, SnapKind, Snapable};
    pub use crate::store::{EntityIntersection, EntityStore};
}
