//! 几何图元定义
//!
//! 支持的基本图元：
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 椭圆 / 椭圆弧 (Ellipse)
//!
//! 所有图元在构造时校验不变量（有限坐标、正半径等），构造完成后不可变。
//! 编辑操作通过构造新的图元实现。

use crate::error::{GeometryError, Result};
use crate::math::{
    cross, normalize_angle, BoundingBox2, CoordinateExt, Point2, Vector2, EPSILON, TAU,
};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};

fn check_point(name: &str, p: &Point2) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::invalid(format!("{name} is not finite: ({}, {})", p.x, p.y)))
    }
}

fn check_scalar(name: &str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::invalid(format!("{name} is not finite: {v}")))
    }
}

fn check_radius(radius: f64) -> Result<()> {
    check_scalar("radius", radius)?;
    if radius <= 0.0 {
        return Err(GeometryError::invalid(format!(
            "radius must be positive, got {radius}"
        )));
    }
    Ok(())
}

/// 线段
///
/// 起点与终点允许重合（零长度线段），此时所有查询都退化为该点。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    start: Point2,
    end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        check_point("line start", &start)?;
        check_point("line end", &end)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Point2 {
        self.start
    }

    pub fn end(&self) -> Point2 {
        self.end
    }

    /// 起点指向终点的向量
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// 是否为零长度线段
    pub fn is_degenerate(&self) -> bool {
        self.delta().norm_squared() < EPSILON * EPSILON
    }

    /// 计算线段方向向量（单位向量），零长度线段返回 `None`
    pub fn direction(&self) -> Option<Vector2> {
        if self.is_degenerate() {
            None
        } else {
            Some(self.delta().normalize())
        }
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 参数 t 处的点（t=0 为起点，t=1 为终点）
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.delta() * t
    }

    /// 点在无限延长线上的投影参数（未夹紧），零长度线段返回 0
    pub fn project(&self, point: &Point2) -> f64 {
        let v = self.delta();
        let len_sq = v.norm_squared();
        if len_sq < EPSILON * EPSILON {
            return 0.0;
        }
        (point - self.start).dot(&v) / len_sq
    }

    /// 线段上距离指定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        if self.is_degenerate() {
            return self.start;
        }
        self.point_at(self.project(point).clamp(0.0, 1.0))
    }

    /// 垂足：仅当投影落在线段内部时存在
    pub fn perpendicular_foot(&self, point: &Point2) -> Option<Point2> {
        if self.is_degenerate() {
            return None;
        }
        let t = self.project(point);
        if (0.0..=1.0).contains(&t) {
            Some(self.point_at(t))
        } else {
            None
        }
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        point.distance_to(&self.nearest_point(point))
    }

    /// 点到无限延长线的有向距离（左侧为正）
    pub fn side_of(&self, point: &Point2) -> f64 {
        match self.direction() {
            Some(dir) => cross(&dir, &(point - self.start)),
            None => 0.0,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        check_point("circle center", &center)?;
        check_radius(radius)?;
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 计算点到圆的距离（负值表示在圆内）
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.center).norm() - self.radius
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        point_on_circle(&self.center, self.radius, angle)
    }

    /// 象限点：0°, 90°, 180°, 270°
    pub fn quadrants(&self) -> [Point2; 4] {
        [0.0, FRAC_PI_2, PI, 1.5 * PI].map(|a| self.point_at_angle(a))
    }

    /// 圆周上距离指定点最近的点；查询点与圆心重合时返回 0° 处的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let v = point - self.center;
        if v.norm() < EPSILON {
            return self.point_at_angle(0.0);
        }
        self.center + v.normalize() * self.radius
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

pub(crate) fn point_on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// 圆弧
///
/// 角度以弧度表示，构造时归一化到 `[0, 2π)`。`ccw` 为真时从起始角逆时针扫到
/// 终止角，否则顺时针。起始角与终止角相同时视为完整一周。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    ccw: bool,
}

impl Arc {
    pub fn new(
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> Result<Self> {
        check_point("arc center", &center)?;
        check_radius(radius)?;
        check_scalar("arc start angle", start_angle)?;
        check_scalar("arc end angle", end_angle)?;
        Ok(Self {
            center,
            radius,
            start_angle: normalize_angle(start_angle),
            end_angle: normalize_angle(end_angle),
            ccw,
        })
    }

    /// 从三点创建圆弧，方向由三点的绕向决定
    pub fn from_three_points(p1: Point2, p2: Point2, p3: Point2) -> Result<Self> {
        let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));

        if d.abs() < EPSILON {
            return Err(GeometryError::invalid("three points are collinear"));
        }

        let ux = ((p1.x * p1.x + p1.y * p1.y) * (p2.y - p3.y)
            + (p2.x * p2.x + p2.y * p2.y) * (p3.y - p1.y)
            + (p3.x * p3.x + p3.y * p3.y) * (p1.y - p2.y))
            / d;
        let uy = ((p1.x * p1.x + p1.y * p1.y) * (p3.x - p2.x)
            + (p2.x * p2.x + p2.y * p2.y) * (p1.x - p3.x)
            + (p3.x * p3.x + p3.y * p3.y) * (p2.x - p1.x))
            / d;

        let center = Point2::new(ux, uy);
        let radius = (p1 - center).norm();
        let ccw = cross(&(p2 - p1), &(p3 - p2)) > 0.0;

        Self::new(center, radius, center.angle_to(&p1), center.angle_to(&p3), ccw)
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn is_ccw(&self) -> bool {
        self.ccw
    }

    /// 以新的起止角构造同圆同向的圆弧
    pub fn with_angles(&self, start_angle: f64, end_angle: f64) -> Result<Self> {
        Self::new(self.center, self.radius, start_angle, end_angle, self.ccw)
    }

    /// 所在的整圆
    pub fn circle(&self) -> Circle {
        Circle {
            center: self.center,
            radius: self.radius,
        }
    }

    /// 扫过的角度（正值，范围 (0, 2π]）
    pub fn sweep_angle(&self) -> f64 {
        let sweep = if self.ccw {
            normalize_angle(self.end_angle - self.start_angle)
        } else {
            normalize_angle(self.start_angle - self.end_angle)
        };
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    /// 角度相对起始角沿扫掠方向的偏移量，范围 [0, 2π)
    pub fn angle_offset(&self, angle: f64) -> f64 {
        if self.ccw {
            normalize_angle(angle - self.start_angle)
        } else {
            normalize_angle(self.start_angle - angle)
        }
    }

    /// 沿扫掠方向偏移 offset 后的角度
    pub fn angle_at_offset(&self, offset: f64) -> f64 {
        if self.ccw {
            normalize_angle(self.start_angle + offset)
        } else {
            normalize_angle(self.start_angle - offset)
        }
    }

    /// 检查角度是否在弧的范围内（含端点容差）
    pub fn contains_angle(&self, angle: f64) -> bool {
        let offset = self.angle_offset(angle);
        offset <= self.sweep_angle() + EPSILON || offset >= TAU - EPSILON
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        point_on_circle(&self.center, self.radius, angle)
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    /// 弧线中点（沿扫掠方向的一半处）
    pub fn mid_point(&self) -> Point2 {
        self.point_at_angle(self.angle_at_offset(self.sweep_angle() / 2.0))
    }

    /// 落在弧范围内的象限点
    pub fn quadrants(&self) -> Vec<Point2> {
        [0.0, FRAC_PI_2, PI, 1.5 * PI]
            .into_iter()
            .filter(|a| self.contains_angle(*a))
            .map(|a| self.point_at_angle(a))
            .collect()
    }

    /// 弧上距离指定点最近的点
    ///
    /// 先径向投影到整圆，再夹紧到弧的角度范围（落在范围外时取较近的端点）。
    /// 查询点与圆心重合时返回起点。
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let v = point - self.center;
        if v.norm() < EPSILON {
            return self.start_point();
        }
        let angle = v.y.atan2(v.x);
        if self.contains_angle(angle) {
            return self.center + v.normalize() * self.radius;
        }
        let start = self.start_point();
        let end = self.end_point();
        if point.distance_to(&start) <= point.distance_to(&end) {
            start
        } else {
            end
        }
    }

    /// 计算点到圆弧的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        point.distance_to(&self.nearest_point(point))
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);
        for q in self.quadrants() {
            bbox.expand_to_include(&q);
        }
        bbox
    }
}

/// 椭圆
///
/// 支持完整椭圆和椭圆弧，使用 DXF 兼容的参数化方式：
/// - 中心点 + 长轴端点（相对向量）+ 短轴比例
/// - 起始/终止参数用于椭圆弧，参数沿逆时针方向递增
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ellipse {
    center: Point2,
    major_axis: Vector2,
    /// 短轴与长轴的比例 (0.0 < ratio <= 1.0)
    ratio: f64,
    /// 起始参数，归一化到 [0, 2π)
    start_param: f64,
    /// 终止参数，满足 start_param < end_param <= start_param + 2π
    end_param: f64,
}

impl Ellipse {
    /// 创建完整椭圆
    pub fn new(center: Point2, major_axis: Vector2, ratio: f64) -> Result<Self> {
        Self::arc(center, major_axis, ratio, 0.0, TAU)
    }

    /// 创建椭圆弧，起止参数相同视为完整椭圆
    pub fn arc(
        center: Point2,
        major_axis: Vector2,
        ratio: f64,
        start_param: f64,
        end_param: f64,
    ) -> Result<Self> {
        check_point("ellipse center", &center)?;
        check_scalar("ellipse major axis", major_axis.x)?;
        check_scalar("ellipse major axis", major_axis.y)?;
        check_scalar("ellipse ratio", ratio)?;
        check_scalar("ellipse start param", start_param)?;
        check_scalar("ellipse end param", end_param)?;
        if major_axis.norm() < EPSILON {
            return Err(GeometryError::invalid("ellipse major axis has zero length"));
        }
        if ratio <= 0.0 || ratio > 1.0 {
            return Err(GeometryError::invalid(format!(
                "ellipse ratio must be in (0, 1], got {ratio}"
            )));
        }

        let start = normalize_angle(start_param);
        let mut span = normalize_angle(end_param - start_param);
        if span < EPSILON {
            span = TAU;
        }

        Ok(Self {
            center,
            major_axis,
            ratio,
            start_param: start,
            end_param: start + span,
        })
    }

    /// 从轴长创建椭圆（水平长轴）
    pub fn from_radii(center: Point2, major_radius: f64, minor_radius: f64) -> Result<Self> {
        check_radius(major_radius)?;
        check_radius(minor_radius)?;
        if minor_radius > major_radius {
            return Self::new(
                center,
                Vector2::new(0.0, minor_radius),
                major_radius / minor_radius,
            );
        }
        Self::new(center, Vector2::new(major_radius, 0.0), minor_radius / major_radius)
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn major_axis(&self) -> Vector2 {
        self.major_axis
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn start_param(&self) -> f64 {
        self.start_param
    }

    pub fn end_param(&self) -> f64 {
        self.end_param
    }

    /// 以新的起止参数构造同一椭圆上的椭圆弧
    pub fn with_params(&self, start_param: f64, end_param: f64) -> Result<Self> {
        Self::arc(self.center, self.major_axis, self.ratio, start_param, end_param)
    }

    /// 获取长轴半径
    pub fn major_radius(&self) -> f64 {
        self.major_axis.norm()
    }

    /// 获取短轴半径
    pub fn minor_radius(&self) -> f64 {
        self.major_radius() * self.ratio
    }

    /// 获取长轴旋转角度（相对于X轴）
    pub fn rotation(&self) -> f64 {
        self.major_axis.y.atan2(self.major_axis.x)
    }

    /// 获取短轴方向向量（单位向量）
    pub fn minor_axis_direction(&self) -> Vector2 {
        let rot = self.rotation();
        Vector2::new(-rot.sin(), rot.cos())
    }

    /// 获取短轴端点向量
    pub fn minor_axis(&self) -> Vector2 {
        self.minor_axis_direction() * self.minor_radius()
    }

    /// 是否是完整椭圆
    pub fn is_full(&self) -> bool {
        (self.end_param - self.start_param - TAU).abs() < EPSILON
    }

    /// 参数跨度
    pub fn param_span(&self) -> f64 {
        self.end_param - self.start_param
    }

    /// 参数相对起始参数的偏移量，范围 [0, 2π)
    pub fn param_offset(&self, t: f64) -> f64 {
        normalize_angle(t - self.start_param)
    }

    /// 检查参数是否在椭圆弧范围内
    pub fn contains_param(&self, t: f64) -> bool {
        if self.is_full() {
            return true;
        }
        let offset = self.param_offset(t);
        offset <= self.param_span() + EPSILON || offset >= TAU - EPSILON
    }

    /// 获取椭圆上指定参数的点
    ///
    /// 参数 t 是椭圆的参数化角度，不是真正的几何角度
    pub fn point_at_param(&self, t: f64) -> Point2 {
        self.local_to_world(self.major_radius() * t.cos(), self.minor_radius() * t.sin())
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        self.point_at_param(self.start_param)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        self.point_at_param(self.end_param)
    }

    /// 世界坐标转换到椭圆局部坐标系（长轴为X轴）
    pub fn world_to_local(&self, point: &Point2) -> (f64, f64) {
        let rot = self.rotation();
        let (sin_r, cos_r) = rot.sin_cos();
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        (dx * cos_r + dy * sin_r, -dx * sin_r + dy * cos_r)
    }

    /// 局部坐标转换回世界坐标
    pub fn local_to_world(&self, x: f64, y: f64) -> Point2 {
        let rot = self.rotation();
        let (sin_r, cos_r) = rot.sin_cos();
        Point2::new(
            self.center.x + x * cos_r - y * sin_r,
            self.center.y + x * sin_r + y * cos_r,
        )
    }

    /// 椭圆隐式方程的值：内部为负，外部为正，曲线上为零
    pub fn implicit(&self, point: &Point2) -> f64 {
        let (x, y) = self.world_to_local(point);
        let a = self.major_radius();
        let b = self.minor_radius();
        (x / a).powi(2) + (y / b).powi(2) - 1.0
    }

    /// 曲线上（或近似在曲线上）的点对应的参数
    pub fn param_of(&self, point: &Point2) -> f64 {
        let (x, y) = self.world_to_local(point);
        normalize_angle((y / self.minor_radius()).atan2(x / self.major_radius()))
    }

    /// 轴端点（长轴两端、短轴两端），按参数 0, π/2, π, 3π/2 排列
    pub fn axis_points(&self) -> [(f64, Point2); 4] {
        [0.0, FRAC_PI_2, PI, 1.5 * PI].map(|t| (t, self.point_at_param(t)))
    }

    /// 椭圆（弧）上距离指定点最近的点的参数
    ///
    /// 先在参数范围内均匀采样找到初值，再用牛顿法细化并夹紧到范围内。
    /// 多个等距候选时取参数最靠近起点的一个。
    pub fn nearest_param(&self, point: &Point2) -> f64 {
        const SAMPLES: usize = 64;

        let (px, py) = self.world_to_local(point);
        let a = self.major_radius();
        let b = self.minor_radius();
        let dist_sq = |t: f64| (a * t.cos() - px).powi(2) + (b * t.sin() - py).powi(2);

        let span = self.param_span();
        let mut best_t = self.start_param;
        let mut best_d = dist_sq(best_t);
        for i in 1..=SAMPLES {
            let t = self.start_param + span * (i as f64) / (SAMPLES as f64);
            let d = dist_sq(t);
            if d < best_d - EPSILON {
                best_t = t;
                best_d = d;
            }
        }

        // g(t) = (P(t) - q)·P'(t)
        let mut t = best_t;
        for _ in 0..16 {
            let (sin_t, cos_t) = t.sin_cos();
            let ex = a * cos_t - px;
            let ey = b * sin_t - py;
            let tx = -a * sin_t;
            let ty = b * cos_t;
            let g = ex * tx + ey * ty;
            let dg = tx * tx + ty * ty + ex * (-a * cos_t) + ey * (-b * sin_t);
            if dg.abs() < EPSILON {
                break;
            }
            let step = g / dg;
            t -= step;
            if step.abs() < EPSILON {
                break;
            }
        }

        if !self.is_full() {
            let offset = self.param_offset(t);
            if offset > span + EPSILON && offset < TAU - EPSILON {
                t = best_t;
            } else {
                t = self.start_param + offset.min(span);
                if offset >= TAU - EPSILON {
                    t = self.start_param;
                }
            }
        }

        if dist_sq(t) <= best_d {
            t
        } else {
            best_t
        }
    }

    /// 椭圆（弧）上距离指定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        self.point_at_param(self.nearest_param(point))
    }

    /// 计算点到椭圆的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        point.distance_to(&self.nearest_point(point))
    }

    /// 获取包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        let rot = self.rotation();
        let cos_r = rot.cos();
        let sin_r = rot.sin();
        let a = self.major_radius();
        let b = self.minor_radius();

        if self.is_full() {
            // 椭圆在 x, y 方向的极值
            let dx = (a * a * cos_r * cos_r + b * b * sin_r * sin_r).sqrt();
            let dy = (a * a * sin_r * sin_r + b * b * cos_r * cos_r).sqrt();
            BoundingBox2::new(
                Point2::new(self.center.x - dx, self.center.y - dy),
                Point2::new(self.center.x + dx, self.center.y + dy),
            )
        } else {
            // 椭圆弧：采样点计算包围盒
            BoundingBox2::from_points(self.sample_points(32))
        }
    }

    /// 获取椭圆上的采样点（用于渲染）
    pub fn sample_points(&self, segments: usize) -> Vec<Point2> {
        let segments = segments.max(1);
        let span = self.param_span();
        (0..=segments)
            .map(|i| self.point_at_param(self.start_param + span * (i as f64) / (segments as f64)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq};

    #[test]
    fn test_line_length() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)).unwrap();
        assert!(approx_eq(line.length(), 5.0));
        assert!(points_approx_eq(&line.midpoint(), &Point2::new(1.5, 2.0)));
    }

    #[test]
    fn test_line_rejects_nan() {
        let err = Line::new(Point2::new(f64::NAN, 0.0), Point2::new(1.0, 1.0));
        assert!(matches!(err, Err(GeometryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_line_nearest_point_clamps() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)).unwrap();
        assert!(points_approx_eq(
            &line.nearest_point(&Point2::new(5.0, 5.0)),
            &Point2::new(5.0, 0.0)
        ));
        assert!(points_approx_eq(
            &line.nearest_point(&Point2::new(-3.0, 2.0)),
            &Point2::new(0.0, 0.0)
        ));
        assert!(points_approx_eq(
            &line.nearest_point(&Point2::new(14.0, -2.0)),
            &Point2::new(10.0, 0.0)
        ));
        assert!(line.perpendicular_foot(&Point2::new(14.0, -2.0)).is_none());
    }

    #[test]
    fn test_zero_length_line() {
        let p = Point2::new(2.0, 3.0);
        let line = Line::new(p, p).unwrap();
        assert!(line.is_degenerate());
        assert!(line.direction().is_none());
        assert!(points_approx_eq(&line.nearest_point(&Point2::new(9.0, -4.0)), &p));
        assert!(points_approx_eq(&line.nearest_point(&p), &p));
        assert!(approx_eq(line.side_of(&Point2::new(0.0, 0.0)), 0.0));
    }

    #[test]
    fn test_circle_rejects_non_positive_radius() {
        assert!(Circle::new(Point2::origin(), 0.0).is_err());
        assert!(Circle::new(Point2::origin(), -1.0).is_err());
        assert!(Circle::new(Point2::origin(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_circle_nearest_point_at_center() {
        let circle = Circle::new(Point2::new(1.0, 1.0), 2.0).unwrap();
        assert!(points_approx_eq(
            &circle.nearest_point(&Point2::new(1.0, 1.0)),
            &Point2::new(3.0, 1.0)
        ));
        assert!(points_approx_eq(
            &circle.nearest_point(&Point2::new(1.0, 10.0)),
            &Point2::new(1.0, 3.0)
        ));
    }

    #[test]
    fn test_arc_rejects_zero_radius() {
        let err = Arc::new(Point2::origin(), 0.0, 0.0, PI, true);
        assert!(matches!(err, Err(GeometryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_arc_sweep_direction() {
        let ccw = Arc::new(Point2::origin(), 5.0, 0.0, PI / 2.0, true).unwrap();
        let cw = Arc::new(Point2::origin(), 5.0, 0.0, PI / 2.0, false).unwrap();
        assert!(approx_eq(ccw.sweep_angle(), PI / 2.0));
        assert!(approx_eq(cw.sweep_angle(), 1.5 * PI));
        assert!(ccw.contains_angle(PI / 4.0));
        assert!(!cw.contains_angle(PI / 4.0));
        assert!(cw.contains_angle(PI));
        assert!(points_approx_eq(&ccw.mid_point(), &ccw.point_at_angle(PI / 4.0)));
        assert!(points_approx_eq(&cw.mid_point(), &cw.point_at_angle(-0.75 * PI)));
    }

    #[test]
    fn test_arc_full_when_angles_equal() {
        let arc = Arc::new(Point2::origin(), 1.0, 1.0, 1.0, true).unwrap();
        assert!(approx_eq(arc.sweep_angle(), TAU));
        assert!(arc.contains_angle(4.0));
    }

    #[test]
    fn test_arc_nearest_point() {
        let arc = Arc::new(Point2::origin(), 5.0, 0.0, PI, true).unwrap();
        assert!(points_approx_eq(
            &arc.nearest_point(&Point2::new(0.0, 10.0)),
            &Point2::new(0.0, 5.0)
        ));
        // 角度落在弧外，取较近端点
        assert!(points_approx_eq(
            &arc.nearest_point(&Point2::new(3.0, -4.0)),
            &Point2::new(5.0, 0.0)
        ));
        assert!(points_approx_eq(&arc.nearest_point(&Point2::origin()), &arc.start_point()));
    }

    #[test]
    fn test_arc_from_three_points() {
        let arc = Arc::from_three_points(
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        )
        .unwrap();
        assert!(points_approx_eq(&arc.center(), &Point2::origin()));
        assert!(approx_eq(arc.radius(), 1.0));
        assert!(arc.is_ccw());
        assert!(approx_eq(arc.sweep_angle(), PI));

        let collinear = Arc::from_three_points(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        );
        assert!(collinear.is_err());
    }

    #[test]
    fn test_arc_bounding_box_includes_quadrants() {
        let arc = Arc::new(Point2::origin(), 2.0, 0.0, PI, true).unwrap();
        let bbox = arc.bounding_box();
        assert!(approx_eq(bbox.max.y, 2.0));
        assert!(approx_eq(bbox.min.y, 0.0));
        assert!(approx_eq(bbox.min.x, -2.0));
    }

    #[test]
    fn test_ellipse_validation() {
        assert!(Ellipse::new(Point2::origin(), Vector2::zeros(), 0.5).is_err());
        assert!(Ellipse::new(Point2::origin(), Vector2::new(2.0, 0.0), 0.0).is_err());
        assert!(Ellipse::new(Point2::origin(), Vector2::new(2.0, 0.0), 1.5).is_err());
        let e = Ellipse::new(Point2::origin(), Vector2::new(2.0, 0.0), 0.5).unwrap();
        assert!(e.is_full());
        assert!(approx_eq(e.minor_radius(), 1.0));
    }

    #[test]
    fn test_ellipse_nearest_point() {
        let e = Ellipse::from_radii(Point2::origin(), 4.0, 2.0).unwrap();
        assert!(points_approx_eq(
            &e.nearest_point(&Point2::new(10.0, 0.0)),
            &Point2::new(4.0, 0.0)
        ));
        assert!(points_approx_eq(
            &e.nearest_point(&Point2::new(0.0, -7.0)),
            &Point2::new(0.0, -2.0)
        ));
        let q = Point2::new(3.0, 3.0);
        let n = e.nearest_point(&q);
        assert!(e.implicit(&n).abs() < 1e-9);
        // 最近点处的连线应垂直于切线
        let t = e.param_of(&n);
        let tangent = Vector2::new(-4.0 * t.sin(), 2.0 * t.cos());
        assert!((q - n).dot(&tangent).abs() < 1e-7);
    }

    #[test]
    fn test_ellipse_arc_nearest_point_clamps() {
        let e = Ellipse::arc(Point2::origin(), Vector2::new(4.0, 0.0), 0.5, 0.0, PI / 2.0)
            .unwrap();
        let n = e.nearest_point(&Point2::new(-10.0, -1.0));
        assert!(points_approx_eq(&n, &Point2::new(0.0, 2.0)));
        assert!(e.contains_param(PI / 4.0));
        assert!(!e.contains_param(PI));
    }

    #[test]
    fn test_ellipse_rotated_point_at_param() {
        let e = Ellipse::new(Point2::new(1.0, 1.0), Vector2::new(0.0, 3.0), 0.5).unwrap();
        assert!(points_approx_eq(&e.point_at_param(0.0), &Point2::new(1.0, 4.0)));
        assert!(points_approx_eq(&e.point_at_param(PI / 2.0), &Point2::new(-0.5, 1.0)));
        assert!(approx_eq(e.implicit(&Point2::new(1.0, -2.0)), 0.0));
    }
}
