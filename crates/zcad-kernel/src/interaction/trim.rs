//! 修剪到边界
//!
//! `accept(subject, boundary, &mut Trim { pick })` 在主体与边界的交点处切断主体，
//! 保留包含拾取点的那一段。主体总是 `accept` 的第一个参数，
//! 访问方法根据 [`PairOrder`] 判断哪个参数是主体。

use super::{EntityInteraction, Intersection, PairOrder};
use crate::entity::EntityKind;
use crate::geometry::{Arc, Circle, Ellipse, Line};
use crate::math::{normalize_angle, CoordinateExt, Point2, EPSILON, TAU};
use tracing::debug;

/// 修剪结果
#[derive(Debug, Clone, PartialEq)]
pub enum TrimResult {
    /// 修剪后的新几何
    Trimmed(EntityKind),
    /// 没有可用的切点，主体保持不变
    Unchanged,
}

impl TrimResult {
    pub fn trimmed(&self) -> Option<&EntityKind> {
        match self {
            TrimResult::Trimmed(kind) => Some(kind),
            TrimResult::Unchanged => None,
        }
    }
}

/// 修剪交互
#[derive(Debug, Clone, Copy)]
pub struct Trim {
    /// 拾取点，决定保留哪一段
    pub pick: Point2,
}

impl Trim {
    pub fn new(pick: Point2) -> Self {
        Self { pick }
    }

    fn trim(&self, subject: EntityKind, cuts: Vec<Point2>) -> TrimResult {
        if cuts.is_empty() {
            return TrimResult::Unchanged;
        }
        let result = match &subject {
            EntityKind::Line(line) => trim_line(line, &cuts, &self.pick),
            EntityKind::Arc(arc) => trim_arc(arc, &cuts, &self.pick),
            EntityKind::Circle(circle) => trim_circle(circle, &cuts, &self.pick),
            EntityKind::Ellipse(ellipse) => trim_ellipse(ellipse, &cuts, &self.pick),
        };
        match result {
            Some(kind) => {
                debug!(subject = subject.entity_type().name(), cuts = cuts.len(), "trimmed entity");
                TrimResult::Trimmed(kind)
            }
            None => TrimResult::Unchanged,
        }
    }

    fn finish<A, B>(&self, first: &A, second: &B, order: PairOrder, cuts: Vec<Point2>) -> TrimResult
    where
        A: Clone + Into<EntityKind>,
        B: Clone + Into<EntityKind>,
    {
        let subject = match order {
            PairOrder::AsGiven => first.clone().into(),
            PairOrder::Swapped => second.clone().into(),
        };
        self.trim(subject, cuts)
    }
}

/// 开放曲线：在 (0, length) 内的切点中找出包围 pick 的区间
fn open_piece(mut cuts: Vec<f64>, pick: f64, length: f64) -> Option<(f64, f64)> {
    cuts.retain(|c| *c > EPSILON && *c < length - EPSILON);
    let lower = cuts.iter().copied().filter(|c| *c < pick).fold(0.0, f64::max);
    let upper = cuts.iter().copied().filter(|c| *c > pick).fold(length, f64::min);
    if lower <= EPSILON && upper >= length - EPSILON {
        None
    } else {
        Some((lower, upper))
    }
}

/// 闭合曲线：至少两个切点，返回逆时针方向包含 pick 的区间（角度/参数）
fn closed_piece(cuts: Vec<f64>, pick: f64) -> Option<(f64, f64)> {
    let mut cuts: Vec<f64> = cuts.into_iter().map(normalize_angle).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    if cuts.len() >= 2 && (cuts[0] + TAU - cuts[cuts.len() - 1]) < EPSILON {
        cuts.pop();
    }
    if cuts.len() < 2 {
        return None;
    }
    let pick = normalize_angle(pick);
    let lower = cuts
        .iter()
        .copied()
        .filter(|c| *c <= pick)
        .last()
        .unwrap_or(cuts[cuts.len() - 1]);
    let upper = cuts
        .iter()
        .copied()
        .find(|c| *c > pick)
        .unwrap_or(cuts[0]);
    Some((lower, upper))
}

fn trim_line(line: &Line, cuts: &[Point2], pick: &Point2) -> Option<EntityKind> {
    if line.is_degenerate() {
        return None;
    }
    let params = cuts.iter().map(|p| line.project(p)).collect();
    let (lo, hi) = open_piece(params, line.project(pick).clamp(0.0, 1.0), 1.0)?;
    Line::new(line.point_at(lo), line.point_at(hi)).ok().map(Into::into)
}

fn trim_arc(arc: &Arc, cuts: &[Point2], pick: &Point2) -> Option<EntityKind> {
    let sweep = arc.sweep_angle();
    let offset_of = |p: &Point2| {
        let offset = arc.angle_offset(arc.center().angle_to(p));
        // 起点附近的数值误差会让偏移量接近 2π
        if offset > sweep + EPSILON {
            0.0
        } else {
            offset.min(sweep)
        }
    };
    let offsets = cuts.iter().map(offset_of).collect();
    let pick_offset = offset_of(&arc.nearest_point(pick));
    let (lo, hi) = open_piece(offsets, pick_offset, sweep)?;
    arc.with_angles(arc.angle_at_offset(lo), arc.angle_at_offset(hi))
        .ok()
        .map(Into::into)
}

fn trim_circle(circle: &Circle, cuts: &[Point2], pick: &Point2) -> Option<EntityKind> {
    let center = circle.center();
    let angles = cuts.iter().map(|p| center.angle_to(p)).collect();
    let pick_angle = if pick.distance_to(&center) < EPSILON {
        0.0
    } else {
        center.angle_to(pick)
    };
    let (lo, hi) = closed_piece(angles, pick_angle)?;
    Arc::new(center, circle.radius(), lo, hi, true).ok().map(Into::into)
}

fn trim_ellipse(ellipse: &Ellipse, cuts: &[Point2], pick: &Point2) -> Option<EntityKind> {
    let pick_param = ellipse.nearest_param(pick);
    if ellipse.is_full() {
        let params = cuts.iter().map(|p| ellipse.param_of(p)).collect();
        let (lo, hi) = closed_piece(params, pick_param)?;
        return ellipse.with_params(lo, hi).ok().map(Into::into);
    }

    let span = ellipse.param_span();
    let offset_of = |t: f64| {
        let offset = ellipse.param_offset(t);
        if offset > span + EPSILON {
            0.0
        } else {
            offset.min(span)
        }
    };
    let offsets = cuts.iter().map(|p| offset_of(ellipse.param_of(p))).collect();
    let (lo, hi) = open_piece(offsets, offset_of(pick_param), span)?;
    let start = ellipse.start_param();
    ellipse.with_params(start + lo, start + hi).ok().map(Into::into)
}

impl EntityInteraction for Trim {
    type Output = TrimResult;

    fn visit_line_line(&mut self, a: &Line, b: &Line, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_line_line(a, b, order).into_points();
        self.finish(a, b, order, cuts)
    }

    fn visit_line_circle(&mut self, line: &Line, circle: &Circle, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_line_circle(line, circle, order).into_points();
        self.finish(line, circle, order, cuts)
    }

    fn visit_line_arc(&mut self, line: &Line, arc: &Arc, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_line_arc(line, arc, order).into_points();
        self.finish(line, arc, order, cuts)
    }

    fn visit_line_ellipse(
        &mut self,
        line: &Line,
        ellipse: &Ellipse,
        order: PairOrder,
    ) -> Self::Output {
        let cuts = Intersection.visit_line_ellipse(line, ellipse, order).into_points();
        self.finish(line, ellipse, order, cuts)
    }

    fn visit_circle_circle(&mut self, a: &Circle, b: &Circle, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_circle_circle(a, b, order).into_points();
        self.finish(a, b, order, cuts)
    }

    fn visit_circle_arc(&mut self, circle: &Circle, arc: &Arc, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_circle_arc(circle, arc, order).into_points();
        self.finish(circle, arc, order, cuts)
    }

    fn visit_circle_ellipse(
        &mut self,
        circle: &Circle,
        ellipse: &Ellipse,
        order: PairOrder,
    ) -> Self::Output {
        let cuts = Intersection.visit_circle_ellipse(circle, ellipse, order).into_points();
        self.finish(circle, ellipse, order, cuts)
    }

    fn visit_arc_arc(&mut self, a: &Arc, b: &Arc, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_arc_arc(a, b, order).into_points();
        self.finish(a, b, order, cuts)
    }

    fn visit_arc_ellipse(&mut self, arc: &Arc, ellipse: &Ellipse, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_arc_ellipse(arc, ellipse, order).into_points();
        self.finish(arc, ellipse, order, cuts)
    }

    fn visit_ellipse_ellipse(&mut self, a: &Ellipse, b: &Ellipse, order: PairOrder) -> Self::Output {
        let cuts = Intersection.visit_ellipse_ellipse(a, b, order).into_points();
        self.finish(a, b, order, cuts)
    }
}
