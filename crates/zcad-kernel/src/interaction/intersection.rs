//! 求交
//!
//! 解析解：线-线、线-圆、圆-圆（以及对应的圆弧组合）、线-椭圆。
//! 数值解：圆/圆弧-椭圆、椭圆-椭圆，沿椭圆参数采样寻找变号区间后二分细化。

use super::{accept, EntityInteraction, PairOrder};
use crate::entity::EntityKind;
use crate::geometry::{Arc, Circle, Ellipse, Line};
use crate::math::{cross, points_approx_eq, CoordinateExt, Point2, Vector2, EPSILON};

/// 结果中视为同一点的距离
const COINCIDENT: f64 = EPSILON * 10.0;

/// 数值求交的采样段数
const SAMPLES: usize = 360;

/// 求交结果
#[derive(Debug, Clone, PartialEq)]
pub enum IntersectionResult {
    /// 没有交点（包括平行、同心等情况）
    NoIntersection,
    /// 一个或多个交点
    Points(Vec<Point2>),
}

impl IntersectionResult {
    fn from_points(points: Vec<Point2>) -> Self {
        if points.is_empty() {
            IntersectionResult::NoIntersection
        } else {
            IntersectionResult::Points(points)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, IntersectionResult::NoIntersection)
    }

    pub fn points(&self) -> &[Point2] {
        match self {
            IntersectionResult::NoIntersection => &[],
            IntersectionResult::Points(points) => points,
        }
    }

    pub fn into_points(self) -> Vec<Point2> {
        match self {
            IntersectionResult::NoIntersection => Vec::new(),
            IntersectionResult::Points(points) => points,
        }
    }
}

/// 求两个实体几何的交点
pub fn intersect(a: &EntityKind, b: &EntityKind) -> IntersectionResult {
    accept(a, b, &mut Intersection)
}

/// 求交交互，结果与参数顺序无关
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersection;

fn push_unique(points: &mut Vec<Point2>, p: Point2) {
    if !points.iter().any(|q| q.distance_to(&p) < COINCIDENT) {
        points.push(p);
    }
}

fn on_segment(line: &Line, p: &Point2) -> bool {
    if line.is_degenerate() {
        return p.distance_to(&line.start()) < COINCIDENT;
    }
    let t = line.project(p);
    let tol = EPSILON / line.length().max(1.0);
    t >= -tol && t <= 1.0 + tol
}

/// 线段与线段
fn line_line(a: &Line, b: &Line) -> Vec<Point2> {
    match (a.direction(), b.direction()) {
        (None, None) => {
            if a.start().distance_to(&b.start()) < COINCIDENT {
                vec![a.start()]
            } else {
                Vec::new()
            }
        }
        (None, Some(_)) => point_on_line(&a.start(), b),
        (Some(_), None) => point_on_line(&b.start(), a),
        (Some(da), Some(db)) => {
            if cross(&da, &db).abs() < EPSILON {
                return Vec::new();
            }
            let d1 = a.delta();
            let d2 = b.delta();
            let denom = cross(&d1, &d2);
            let d = b.start() - a.start();
            let t1 = cross(&d, &d2) / denom;
            let p = a.point_at(t1);
            if on_segment(a, &p) && on_segment(b, &p) {
                vec![p]
            } else {
                Vec::new()
            }
        }
    }
}

fn point_on_line(p: &Point2, line: &Line) -> Vec<Point2> {
    if line.distance_to_point(p) < COINCIDENT {
        vec![*p]
    } else {
        Vec::new()
    }
}

/// 线段与整圆，结果位于线段上
fn line_circle(line: &Line, center: &Point2, radius: f64) -> Vec<Point2> {
    let Some(dir) = line.direction() else {
        let d = line.start().distance_to(center);
        return if (d - radius).abs() < EPSILON {
            vec![line.start()]
        } else {
            Vec::new()
        };
    };

    // 圆心在直线上的垂足
    let foot = line.start() + dir * (center - line.start()).dot(&dir);
    let dist = foot.distance_to(center);

    let mut candidates = Vec::new();
    if (dist - radius).abs() < EPSILON {
        candidates.push(foot);
    } else if dist < radius {
        let h = (radius * radius - dist * dist).sqrt();
        candidates.push(foot - dir * h);
        candidates.push(foot + dir * h);
    }

    let mut points = Vec::new();
    for p in candidates {
        if on_segment(line, &p) {
            push_unique(&mut points, p);
        }
    }
    points
}

/// 整圆与整圆
fn circle_circle(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> Vec<Point2> {
    let v = c2 - c1;
    let d = v.norm();
    if d < EPSILON {
        // 同心（含重合）不产生孤立交点
        return Vec::new();
    }
    if d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON {
        return Vec::new();
    }

    let dir = v / d;
    // 圆心连线上到根轴的距离
    let a = (d * d + r1 * r1 - r2 * r2) / (2.0 * d);
    let base = c1 + dir * a;

    let tangent = (d - (r1 + r2)).abs() < EPSILON || (d - (r1 - r2).abs()).abs() < EPSILON;
    if tangent {
        return vec![base];
    }

    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let normal = Vector2::new(-dir.y, dir.x);
    vec![base + normal * h, base - normal * h]
}

/// 线段与椭圆（弧）：变换到椭圆归一化坐标系后按单位圆求解
fn line_ellipse(line: &Line, ellipse: &Ellipse) -> Vec<Point2> {
    let a = ellipse.major_radius();
    let b = ellipse.minor_radius();
    let normalized = |p: &Point2| {
        let (x, y) = ellipse.world_to_local(p);
        (x / a, y / b)
    };

    let (x0, y0) = normalized(&line.start());
    let (x1, y1) = normalized(&line.end());
    let (dx, dy) = (x1 - x0, y1 - y0);

    let qa = dx * dx + dy * dy;
    let qb = x0 * dx + y0 * dy;
    let qc = x0 * x0 + y0 * y0 - 1.0;

    let mut params = Vec::new();
    if qa < EPSILON * EPSILON {
        if qc.abs() < EPSILON {
            params.push(0.0);
        }
    } else {
        let disc = qb * qb - qa * qc;
        if disc.abs() < EPSILON * qa.max(1.0) {
            params.push(-qb / qa);
        } else if disc > 0.0 {
            let s = disc.sqrt();
            params.push((-qb - s) / qa);
            params.push((-qb + s) / qa);
        }
    }

    let mut points = Vec::new();
    for t in params {
        let p = line.point_at(t);
        if on_segment(line, &p) && ellipse.contains_param(ellipse.param_of(&p)) {
            push_unique(&mut points, p);
        }
    }
    points
}

/// 沿椭圆参数求 f(P(t)) = 0 的根
fn ellipse_roots<F>(ellipse: &Ellipse, f: F) -> Vec<Point2>
where
    F: Fn(&Point2) -> f64,
{
    let start = ellipse.start_param();
    let span = ellipse.param_span();
    let param = |i: usize| start + span * (i as f64) / (SAMPLES as f64);
    let value = |t: f64| f(&ellipse.point_at_param(t));

    let values: Vec<f64> = (0..=SAMPLES).map(|i| value(param(i))).collect();
    let mut roots = Vec::new();

    for i in 0..SAMPLES {
        let (t0, t1) = (param(i), param(i + 1));
        let (f0, f1) = (values[i], values[i + 1]);

        if f0.abs() < EPSILON {
            roots.push(t0);
        } else if f0 * f1 < 0.0 {
            roots.push(bisect(&value, t0, t1, f0));
        } else if i > 0 {
            // 相切：|f| 在采样点处取得局部极小且接近零
            let prev = values[i - 1];
            if f0.abs() < prev.abs() && f0.abs() < f1.abs() && f0 * prev > 0.0 {
                let t = minimize_abs(&value, param(i - 1), t1);
                if value(t).abs() < EPSILON * 100.0 {
                    roots.push(t);
                }
            }
        }
    }
    if values[SAMPLES].abs() < EPSILON {
        roots.push(param(SAMPLES));
    }

    let mut points = Vec::new();
    for t in roots {
        push_unique(&mut points, ellipse.point_at_param(t));
    }
    points
}

fn bisect<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return mid;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    0.5 * (lo + hi)
}

/// 黄金分割搜索 |f| 的极小值
fn minimize_abs<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64) -> f64 {
    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    for _ in 0..100 {
        let m1 = hi - ratio * (hi - lo);
        let m2 = lo + ratio * (hi - lo);
        if f(m1).abs() < f(m2).abs() {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    0.5 * (lo + hi)
}

fn circle_ellipse(center: &Point2, radius: f64, ellipse: &Ellipse) -> Vec<Point2> {
    ellipse_roots(ellipse, |p| p.distance_to(center) - radius)
}

/// 两个椭圆是否位于同一条曲线上
fn same_curve(a: &Ellipse, b: &Ellipse) -> bool {
    let same_axis = (a.major_axis() - b.major_axis()).norm() < EPSILON
        || (a.major_axis() + b.major_axis()).norm() < EPSILON;
    points_approx_eq(&a.center(), &b.center())
        && same_axis
        && (a.ratio() - b.ratio()).abs() < EPSILON
}

fn ellipse_ellipse(a: &Ellipse, b: &Ellipse) -> Vec<Point2> {
    if same_curve(a, b) {
        // 重合曲线不产生孤立交点
        return Vec::new();
    }
    ellipse_roots(a, |p| b.implicit(p))
        .into_iter()
        .filter(|p| b.contains_param(b.param_of(p)))
        .collect()
}

fn on_arc(arc: &Arc, p: &Point2) -> bool {
    arc.contains_angle(arc.center().angle_to(p))
}

impl EntityInteraction for Intersection {
    type Output = IntersectionResult;

    fn visit_line_line(&mut self, a: &Line, b: &Line, _order: PairOrder) -> Self::Output {
        IntersectionResult::from_points(line_line(a, b))
    }

    fn visit_line_circle(&mut self, line: &Line, circle: &Circle, _order: PairOrder) -> Self::Output {
        IntersectionResult::from_points(line_circle(line, &circle.center(), circle.radius()))
    }

    fn visit_line_arc(&mut self, line: &Line, arc: &Arc, _order: PairOrder) -> Self::Output {
        let points = line_circle(line, &arc.center(), arc.radius())
            .into_iter()
            .filter(|p| on_arc(arc, p))
            .collect();
        IntersectionResult::from_points(points)
    }

    fn visit_line_ellipse(
        &mut self,
        line: &Line,
        ellipse: &Ellipse,
        _order: PairOrder,
    ) -> Self::Output {
        IntersectionResult::from_points(line_ellipse(line, ellipse))
    }

    fn visit_circle_circle(&mut self, a: &Circle, b: &Circle, _order: PairOrder) -> Self::Output {
        IntersectionResult::from_points(circle_circle(
            &a.center(),
            a.radius(),
            &b.center(),
            b.radius(),
        ))
    }

    fn visit_circle_arc(&mut self, circle: &Circle, arc: &Arc, _order: PairOrder) -> Self::Output {
        let points = circle_circle(&circle.center(), circle.radius(), &arc.center(), arc.radius())
            .into_iter()
            .filter(|p| on_arc(arc, p))
            .collect();
        IntersectionResult::from_points(points)
    }

    fn visit_circle_ellipse(
        &mut self,
        circle: &Circle,
        ellipse: &Ellipse,
        _order: PairOrder,
    ) -> Self::Output {
        IntersectionResult::from_points(circle_ellipse(&circle.center(), circle.radius(), ellipse))
    }

    fn visit_arc_arc(&mut self, a: &Arc, b: &Arc, _order: PairOrder) -> Self::Output {
        let points = circle_circle(&a.center(), a.radius(), &b.center(), b.radius())
            .into_iter()
            .filter(|p| on_arc(a, p) && on_arc(b, p))
            .collect();
        IntersectionResult::from_points(points)
    }

    fn visit_arc_ellipse(&mut self, arc: &Arc, ellipse: &Ellipse, _order: PairOrder) -> Self::Output {
        let points = circle_ellipse(&arc.center(), arc.radius(), ellipse)
            .into_iter()
            .filter(|p| on_arc(arc, p))
            .collect();
        IntersectionResult::from_points(points)
    }

    fn visit_ellipse_ellipse(&mut self, a: &Ellipse, b: &Ellipse, _order: PairOrder) -> Self::Output {
        IntersectionResult::from_points(ellipse_ellipse(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CadEntity, EntityType};
    use crate::math::{points_approx_eq, Vector2};
    use std::f64::consts::PI;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> EntityKind {
        Line::new(Point2::new(x0, y0), Point2::new(x1, y1)).unwrap().into()
    }

    fn circle(x: f64, y: f64, r: f64) -> EntityKind {
        Circle::new(Point2::new(x, y), r).unwrap().into()
    }

    fn arc(x: f64, y: f64, r: f64, start: f64, end: f64, ccw: bool) -> EntityKind {
        Arc::new(Point2::new(x, y), r, start, end, ccw).unwrap().into()
    }

    fn ellipse(x: f64, y: f64, a: f64, b: f64) -> EntityKind {
        Ellipse::from_radii(Point2::new(x, y), a, b).unwrap().into()
    }

    /// 两组点在容差内相同（与顺序无关）
    fn same_points(a: &[Point2], b: &[Point2], tol: f64) -> bool {
        a.len() == b.len()
            && a.iter().all(|p| b.iter().any(|q| p.distance_to(q) < tol))
    }

    fn contains_point(result: &IntersectionResult, p: Point2) -> bool {
        result.points().iter().any(|q| q.distance_to(&p) < 1e-7)
    }

    #[test]
    fn test_line_line_intersection() {
        let result = intersect(&line(0.0, 0.0, 10.0, 0.0), &line(5.0, -5.0, 5.0, 5.0));
        assert_eq!(result.points().len(), 1);
        assert!(points_approx_eq(&result.points()[0], &Point2::new(5.0, 0.0)));
    }

    #[test]
    fn test_parallel_lines_have_no_intersection() {
        let result = intersect(&line(0.0, 0.0, 10.0, 0.0), &line(0.0, 1.0, 10.0, 1.0));
        assert_eq!(result, IntersectionResult::NoIntersection);

        let collinear = intersect(&line(0.0, 0.0, 10.0, 0.0), &line(5.0, 0.0, 15.0, 0.0));
        assert!(collinear.is_empty());
    }

    #[test]
    fn test_line_line_outside_segments() {
        let result = intersect(&line(0.0, 0.0, 1.0, 0.0), &line(5.0, -5.0, 5.0, 5.0));
        assert!(result.is_empty());
    }

    #[test]
    fn test_line_line_touching_endpoint() {
        let result = intersect(&line(0.0, 0.0, 10.0, 0.0), &line(10.0, -5.0, 10.0, 5.0));
        assert!(contains_point(&result, Point2::new(10.0, 0.0)));
    }

    #[test]
    fn test_degenerate_line_on_other_line() {
        let result = intersect(&line(3.0, 0.0, 3.0, 0.0), &line(0.0, 0.0, 10.0, 0.0));
        assert!(contains_point(&result, Point2::new(3.0, 0.0)));
        let miss = intersect(&line(3.0, 1.0, 3.0, 1.0), &line(0.0, 0.0, 10.0, 0.0));
        assert!(miss.is_empty());
    }

    #[test]
    fn test_line_circle_intersection() {
        let result = intersect(&line(-10.0, 0.0, 10.0, 0.0), &circle(0.0, 0.0, 5.0));
        assert_eq!(result.points().len(), 2);
        assert!(contains_point(&result, Point2::new(-5.0, 0.0)));
        assert!(contains_point(&result, Point2::new(5.0, 0.0)));
    }

    #[test]
    fn test_line_tangent_to_circle() {
        let result = intersect(&line(-10.0, 5.0, 10.0, 5.0), &circle(0.0, 0.0, 5.0));
        assert_eq!(result.points().len(), 1);
        assert!(contains_point(&result, Point2::new(0.0, 5.0)));
    }

    #[test]
    fn test_line_arc_filters_span() {
        let upper = arc(0.0, 0.0, 5.0, 0.0, PI, true);
        let result = intersect(&line(0.0, -10.0, 0.0, 10.0), &upper);
        assert_eq!(result.points().len(), 1);
        assert!(contains_point(&result, Point2::new(0.0, 5.0)));

        let lower = arc(0.0, 0.0, 5.0, 0.0, PI, false);
        let result = intersect(&line(0.0, -10.0, 0.0, 10.0), &lower);
        assert!(contains_point(&result, Point2::new(0.0, -5.0)));
    }

    #[test]
    fn test_circle_circle_intersection() {
        let result = intersect(&circle(0.0, 0.0, 5.0), &circle(8.0, 0.0, 5.0));
        assert_eq!(result.points().len(), 2);
        assert!(contains_point(&result, Point2::new(4.0, 3.0)));
        assert!(contains_point(&result, Point2::new(4.0, -3.0)));
    }

    #[test]
    fn test_tangent_and_concentric_circles() {
        let tangent = intersect(&circle(0.0, 0.0, 2.0), &circle(5.0, 0.0, 3.0));
        assert_eq!(tangent.points().len(), 1);
        assert!(contains_point(&tangent, Point2::new(2.0, 0.0)));

        let concentric = intersect(&circle(0.0, 0.0, 2.0), &circle(0.0, 0.0, 3.0));
        assert!(concentric.is_empty());

        let apart = intersect(&circle(0.0, 0.0, 1.0), &circle(5.0, 0.0, 1.0));
        assert!(apart.is_empty());
    }

    #[test]
    fn test_arc_arc_intersection() {
        let a = arc(0.0, 0.0, 5.0, 0.0, PI, true);
        let b = arc(8.0, 0.0, 5.0, 0.0, PI, true);
        let result = intersect(&a, &b);
        assert_eq!(result.points().len(), 1);
        assert!(contains_point(&result, Point2::new(4.0, 3.0)));
    }

    #[test]
    fn test_line_ellipse_intersection() {
        let result = intersect(&line(-10.0, 0.0, 10.0, 0.0), &ellipse(0.0, 0.0, 4.0, 2.0));
        assert_eq!(result.points().len(), 2);
        assert!(contains_point(&result, Point2::new(4.0, 0.0)));
        assert!(contains_point(&result, Point2::new(-4.0, 0.0)));

        let tangent = intersect(&line(-10.0, 2.0, 10.0, 2.0), &ellipse(0.0, 0.0, 4.0, 2.0));
        assert_eq!(tangent.points().len(), 1);
        assert!(contains_point(&tangent, Point2::new(0.0, 2.0)));
    }

    #[test]
    fn test_line_elliptic_arc_filters_span() {
        let e = Ellipse::arc(Point2::origin(), Vector2::new(4.0, 0.0), 0.5, 0.0, PI).unwrap();
        let result = intersect(&line(0.0, -10.0, 0.0, 10.0), &e.into());
        assert_eq!(result.points().len(), 1);
        assert!(contains_point(&result, Point2::new(0.0, 2.0)));
    }

    #[test]
    fn test_circle_ellipse_intersection() {
        // x²/16 + y²/4 = 1 与 x² + y² = 9 相交于 x² = 20/3
        let result = intersect(&circle(0.0, 0.0, 3.0), &ellipse(0.0, 0.0, 4.0, 2.0));
        assert_eq!(result.points().len(), 4);
        let x = (20.0_f64 / 3.0).sqrt();
        let y = (9.0 - 20.0 / 3.0_f64).sqrt();
        for p in [
            Point2::new(x, y),
            Point2::new(-x, y),
            Point2::new(-x, -y),
            Point2::new(x, -y),
        ] {
            assert!(contains_point(&result, p), "missing {p:?}");
        }
    }

    #[test]
    fn test_circle_tangent_to_ellipse() {
        let result = intersect(&circle(0.0, 0.0, 2.0), &ellipse(0.0, 0.0, 4.0, 2.0));
        assert_eq!(result.points().len(), 2);
        assert!(contains_point(&result, Point2::new(0.0, 2.0)));
        assert!(contains_point(&result, Point2::new(0.0, -2.0)));
    }

    #[test]
    fn test_ellipse_ellipse_intersection() {
        let a = ellipse(0.0, 0.0, 4.0, 2.0);
        let b = Ellipse::new(Point2::origin(), Vector2::new(0.0, 4.0), 0.5).unwrap().into();
        let result = intersect(&a, &b);
        // 两个正交椭圆在 x² = y² = 16/5 处相交
        assert_eq!(result.points().len(), 4);
        let v = (16.0_f64 / 5.0).sqrt();
        assert!(contains_point(&result, Point2::new(v, v)));
        assert!(contains_point(&result, Point2::new(-v, -v)));
    }

    #[test]
    fn test_intersection_symmetry_across_all_pairs() {
        let shapes = [
            line(-6.0, -1.0, 6.0, 2.0),
            circle(1.0, 0.0, 3.0),
            arc(0.0, 1.0, 3.5, 0.3, 4.0, true),
            ellipse(0.5, 0.0, 5.0, 2.5),
        ];
        for a in &shapes {
            for b in &shapes {
                let forward = intersect(a, b);
                let backward = intersect(b, a);
                assert!(
                    same_points(forward.points(), backward.points(), 1e-7),
                    "{:?} x {:?}",
                    a.entity_type(),
                    b.entity_type()
                );
            }
        }
    }

    #[test]
    fn test_entity_accept_uses_intersection() {
        let a = CadEntity::new(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)).unwrap());
        let b = CadEntity::new(Circle::new(Point2::new(5.0, 0.0), 2.0).unwrap());
        assert_eq!(b.entity_type(), EntityType::Circle);
        let forward = a.accept(&b, &mut Intersection);
        let backward = b.accept(&a, &mut Intersection);
        assert!(same_points(forward.points(), backward.points(), 1e-9));
        assert_eq!(forward.points().len(), 2);
    }
}
