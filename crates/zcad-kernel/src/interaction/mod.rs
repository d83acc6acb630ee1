//! 实体交互（双分派）
//!
//! [`EntityInteraction`] 为每一对无序的实体类型提供一个 `visit_*` 方法。
//! [`accept`] 根据两个实体的运行时类型选出唯一匹配的方法：
//! 参数按 [`EntityType`] 的声明顺序规范化，并通过 [`PairOrder`]
//! 告知访问者参数是否被交换过。
//!
//! 新增实体类型时，`accept` 中的 `match` 与本 trait 都会在编译期报出缺失的组合。

mod intersection;
mod trim;

pub use intersection::{intersect, Intersection, IntersectionResult};
pub use trim::{Trim, TrimResult};

use crate::entity::{EntityKind, EntityType};
use crate::geometry::{Arc, Circle, Ellipse, Line};
use tracing::trace;

/// 访问参数相对 `accept(a, b)` 的顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    /// 第一个参数来自 `a`
    AsGiven,
    /// 第一个参数来自 `b`
    Swapped,
}

/// 实体对之间的交互操作
///
/// 每个方法的参数按规范顺序（Line < Circle < Arc < Ellipse）排列；
/// 同类型的组合中第一个参数总是来自 `a`。
pub trait EntityInteraction {
    type Output;

    fn visit_line_line(&mut self, a: &Line, b: &Line, order: PairOrder) -> Self::Output;
    fn visit_line_circle(&mut self, line: &Line, circle: &Circle, order: PairOrder) -> Self::Output;
    fn visit_line_arc(&mut self, line: &Line, arc: &Arc, order: PairOrder) -> Self::Output;
    fn visit_line_ellipse(&mut self, line: &Line, ellipse: &Ellipse, order: PairOrder)
        -> Self::Output;
    fn visit_circle_circle(&mut self, a: &Circle, b: &Circle, order: PairOrder) -> Self::Output;
    fn visit_circle_arc(&mut self, circle: &Circle, arc: &Arc, order: PairOrder) -> Self::Output;
    fn visit_circle_ellipse(
        &mut self,
        circle: &Circle,
        ellipse: &Ellipse,
        order: PairOrder,
    ) -> Self::Output;
    fn visit_arc_arc(&mut self, a: &Arc, b: &Arc, order: PairOrder) -> Self::Output;
    fn visit_arc_ellipse(&mut self, arc: &Arc, ellipse: &Ellipse, order: PairOrder)
        -> Self::Output;
    fn visit_ellipse_ellipse(&mut self, a: &Ellipse, b: &Ellipse, order: PairOrder)
        -> Self::Output;
}

/// 类型标签层面的规范化：返回规范顺序的类型对以及是否交换
pub fn canonical_pair(a: EntityType, b: EntityType) -> ((EntityType, EntityType), PairOrder) {
    if b < a {
        ((b, a), PairOrder::Swapped)
    } else {
        ((a, b), PairOrder::AsGiven)
    }
}

/// 双分派：把 `(a, b)` 解析到唯一的 `visit_*` 方法
pub fn accept<I: EntityInteraction>(a: &EntityKind, b: &EntityKind, interaction: &mut I) -> I::Output {
    use EntityKind as K;
    use PairOrder::{AsGiven, Swapped};

    trace!(
        first = a.entity_type().name(),
        second = b.entity_type().name(),
        "dispatching entity interaction"
    );

    match (a, b) {
        (K::Line(x), K::Line(y)) => interaction.visit_line_line(x, y, AsGiven),
        (K::Line(x), K::Circle(y)) => interaction.visit_line_circle(x, y, AsGiven),
        (K::Line(x), K::Arc(y)) => interaction.visit_line_arc(x, y, AsGiven),
        (K::Line(x), K::Ellipse(y)) => interaction.visit_line_ellipse(x, y, AsGiven),

        (K::Circle(x), K::Line(y)) => interaction.visit_line_circle(y, x, Swapped),
        (K::Circle(x), K::Circle(y)) => interaction.visit_circle_circle(x, y, AsGiven),
        (K::Circle(x), K::Arc(y)) => interaction.visit_circle_arc(x, y, AsGiven),
        (K::Circle(x), K::Ellipse(y)) => interaction.visit_circle_ellipse(x, y, AsGiven),

        (K::Arc(x), K::Line(y)) => interaction.visit_line_arc(y, x, Swapped),
        (K::Arc(x), K::Circle(y)) => interaction.visit_circle_arc(y, x, Swapped),
        (K::Arc(x), K::Arc(y)) => interaction.visit_arc_arc(x, y, AsGiven),
        (K::Arc(x), K::Ellipse(y)) => interaction.visit_arc_ellipse(x, y, AsGiven),

        (K::Ellipse(x), K::Line(y)) => interaction.visit_line_ellipse(y, x, Swapped),
        (K::Ellipse(x), K::Circle(y)) => interaction.visit_circle_ellipse(y, x, Swapped),
        (K::Ellipse(x), K::Arc(y)) => interaction.visit_arc_ellipse(y, x, Swapped),
        (K::Ellipse(x), K::Ellipse(y)) => interaction.visit_ellipse_ellipse(x, y, AsGiven),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, Vector2};
    use std::f64::consts::PI;

    /// 记录被调用的方法与参数顺序
    struct Recorder;

    impl EntityInteraction for Recorder {
        type Output = ((EntityType, EntityType), PairOrder);

        fn visit_line_line(&mut self, _: &Line, _: &Line, order: PairOrder) -> Self::Output {
            ((EntityType::Line, EntityType::Line), order)
        }
        fn visit_line_circle(&mut self, _: &Line, _: &Circle, order: PairOrder) -> Self::Output {
            ((EntityType::Line, EntityType::Circle), order)
        }
        fn visit_line_arc(&mut self, _: &Line, _: &Arc, order: PairOrder) -> Self::Output {
            ((EntityType::Line, EntityType::Arc), order)
        }
        fn visit_line_ellipse(&mut self, _: &Line, _: &Ellipse, order: PairOrder) -> Self::Output {
            ((EntityType::Line, EntityType::Ellipse), order)
        }
        fn visit_circle_circle(&mut self, _: &Circle, _: &Circle, order: PairOrder) -> Self::Output {
            ((EntityType::Circle, EntityType::Circle), order)
        }
        fn visit_circle_arc(&mut self, _: &Circle, _: &Arc, order: PairOrder) -> Self::Output {
            ((EntityType::Circle, EntityType::Arc), order)
        }
        fn visit_circle_ellipse(
            &mut self,
            _: &Circle,
            _: &Ellipse,
            order: PairOrder,
        ) -> Self::Output {
            ((EntityType::Circle, EntityType::Ellipse), order)
        }
        fn visit_arc_arc(&mut self, _: &Arc, _: &Arc, order: PairOrder) -> Self::Output {
            ((EntityType::Arc, EntityType::Arc), order)
        }
        fn visit_arc_ellipse(&mut self, _: &Arc, _: &Ellipse, order: PairOrder) -> Self::Output {
            ((EntityType::Arc, EntityType::Ellipse), order)
        }
        fn visit_ellipse_ellipse(
            &mut self,
            _: &Ellipse,
            _: &Ellipse,
            order: PairOrder,
        ) -> Self::Output {
            ((EntityType::Ellipse, EntityType::Ellipse), order)
        }
    }

    fn sample(entity_type: EntityType) -> EntityKind {
        match entity_type {
            EntityType::Line => {
                Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).unwrap().into()
            }
            EntityType::Circle => Circle::new(Point2::origin(), 1.0).unwrap().into(),
            EntityType::Arc => Arc::new(Point2::origin(), 1.0, 0.0, PI, true).unwrap().into(),
            EntityType::Ellipse => Ellipse::new(Point2::origin(), Vector2::new(2.0, 0.0), 0.5)
                .unwrap()
                .into(),
        }
    }

    #[test]
    fn test_every_pair_dispatches_to_canonical_visit() {
        for a in EntityType::ALL {
            for b in EntityType::ALL {
                let got = accept(&sample(a), &sample(b), &mut Recorder);
                assert_eq!(got, canonical_pair(a, b), "pair {a:?} x {b:?}");
            }
        }
    }

    #[test]
    fn test_reversed_pair_reaches_same_visit() {
        for a in EntityType::ALL {
            for b in EntityType::ALL {
                let (forward, _) = accept(&sample(a), &sample(b), &mut Recorder);
                let (backward, _) = accept(&sample(b), &sample(a), &mut Recorder);
                assert_eq!(forward, backward);
            }
        }
    }
}
