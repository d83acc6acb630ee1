//! 对象捕捉
//!
//! 任何可被捕捉的图元都实现 [`Snapable`]：
//! - `snap_points` 返回按到光标距离升序排列、最多 `max_count` 个捕捉点
//! - `nearest_point_on_path` 返回图元可见路径上离光标最近的点
//!
//! 捕捉点带有来源信息（[`SnapKind`] 与实体ID），供界面绘制捕捉标记。

use crate::entity::{CadEntity, EntityId, EntityKind};
use crate::geometry::{Arc, Circle, Ellipse, Line};
use crate::math::{points_approx_eq, CoordinateExt, Point2, EPSILON};
use serde::{Deserialize, Serialize};

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapKind {
    /// 端点捕捉
    Endpoint,
    /// 中点捕捉
    Midpoint,
    /// 圆心捕捉
    Center,
    /// 象限点（圆/弧/椭圆轴端点）
    Quadrant,
    /// 交点捕捉
    Intersection,
    /// 垂足捕捉
    Perpendicular,
    /// 路径上的最近点
    Nearest,
}

impl SnapKind {
    /// 获取捕捉类型的快捷键
    pub fn shortcut(&self) -> &'static str {
        match self {
            SnapKind::Endpoint => "END",
            SnapKind::Midpoint => "MID",
            SnapKind::Center => "CEN",
            SnapKind::Quadrant => "QUA",
            SnapKind::Intersection => "INT",
            SnapKind::Perpendicular => "PER",
            SnapKind::Nearest => "NEA",
        }
    }
}

/// 带来源信息的捕捉坐标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityCoordinate {
    /// 捕捉到的世界坐标
    pub point: Point2,
    /// 捕捉类型
    pub kind: SnapKind,
    /// 关联的实体ID（几何层面的查询没有实体）
    pub entity: Option<EntityId>,
    /// 到查询点的距离（用于排序）
    pub distance: f64,
}

impl EntityCoordinate {
    pub fn new(point: Point2, kind: SnapKind, query: &Point2) -> Self {
        Self {
            point,
            kind,
            entity: None,
            distance: point.distance_to(query),
        }
    }

    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }
}

/// 按距离升序排序并截断到 `max_count` 个
///
/// 排序是稳定的，距离相同的点保持候选生成顺序。
pub fn rank_snap_points(mut points: Vec<EntityCoordinate>, max_count: usize) -> Vec<EntityCoordinate> {
    points.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    points.truncate(max_count);
    points
}

/// 捕捉配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// 返回的最大捕捉点数量
    pub max_snap_points: usize,
    /// 路径最近点的捕捉距离（世界单位）
    pub min_distance_to_snap: f64,
    /// 是否计算实体之间的交点捕捉
    pub intersections: bool,
    /// 交点捕捉的搜索半径（世界单位），只考虑光标附近的实体
    pub intersection_radius: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            max_snap_points: 8,
            min_distance_to_snap: 10.0,
            intersections: true,
            intersection_radius: 50.0,
        }
    }
}

/// 可捕捉能力
pub trait Snapable {
    /// 图元本身的特征点（与查询点无关）
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)>;

    /// 可见路径上离 `query` 最近的点
    fn nearest_point_on_path(&self, query: &Point2) -> Point2;

    /// 从 `from` 出发到路径的垂足
    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2>;

    /// 按距离排序的捕捉点
    ///
    /// `min_distance_to_snap` 不是硬性过滤条件：所有特征点都参与排序，
    /// 只有路径最近点要求距离不超过该值才会加入。
    fn snap_points(
        &self,
        query: &Point2,
        min_distance_to_snap: f64,
        max_count: usize,
    ) -> Vec<EntityCoordinate> {
        let mut points: Vec<EntityCoordinate> = self
            .snap_candidates()
            .into_iter()
            .map(|(p, kind)| EntityCoordinate::new(p, kind, query))
            .collect();

        let nearest = self.nearest_point_on_path(query);
        if nearest.distance_to(query) <= min_distance_to_snap
            && !points.iter().any(|c| points_approx_eq(&c.point, &nearest))
        {
            points.push(EntityCoordinate::new(nearest, SnapKind::Nearest, query));
        }

        rank_snap_points(points, max_count)
    }
}

impl Snapable for Line {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        if self.is_degenerate() {
            return vec![(self.start(), SnapKind::Endpoint)];
        }
        vec![
            (self.start(), SnapKind::Endpoint),
            (self.end(), SnapKind::Endpoint),
            (self.midpoint(), SnapKind::Midpoint),
        ]
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        self.nearest_point(query)
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        self.perpendicular_foot(from).into_iter().collect()
    }
}

impl Snapable for Circle {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        let mut points = vec![(self.center(), SnapKind::Center)];
        points.extend(self.quadrants().map(|q| (q, SnapKind::Quadrant)));
        points
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        self.nearest_point(query)
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        let v = from - self.center();
        if v.norm() < EPSILON {
            return Vec::new();
        }
        let dir = v.normalize() * self.radius();
        vec![self.center() + dir, self.center() - dir]
    }
}

impl Snapable for Arc {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        let mut points = vec![
            (self.center(), SnapKind::Center),
            (self.start_point(), SnapKind::Endpoint),
            (self.end_point(), SnapKind::Endpoint),
            (self.mid_point(), SnapKind::Midpoint),
        ];
        for q in self.quadrants() {
            if !points.iter().any(|(p, _)| points_approx_eq(p, &q)) {
                points.push((q, SnapKind::Quadrant));
            }
        }
        points
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        self.nearest_point(query)
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        self.circle()
            .perpendicular_points(from)
            .into_iter()
            .filter(|p| self.contains_angle(self.center().angle_to(p)))
            .collect()
    }
}

impl Snapable for Ellipse {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        let mut points = vec![(self.center(), SnapKind::Center)];
        if !self.is_full() {
            points.push((self.start_point(), SnapKind::Endpoint));
            points.push((self.end_point(), SnapKind::Endpoint));
        }
        for (t, p) in self.axis_points() {
            if self.contains_param(t) && !points.iter().any(|(q, _)| points_approx_eq(q, &p)) {
                points.push((p, SnapKind::Quadrant));
            }
        }
        points
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        self.nearest_point(query)
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        vec![self.nearest_point(from)]
    }
}

impl Snapable for EntityKind {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        match self {
            EntityKind::Line(l) => l.snap_candidates(),
            EntityKind::Circle(c) => c.snap_candidates(),
            EntityKind::Arc(a) => a.snap_candidates(),
            EntityKind::Ellipse(e) => e.snap_candidates(),
        }
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        match self {
            EntityKind::Line(l) => l.nearest_point_on_path(query),
            EntityKind::Circle(c) => c.nearest_point_on_path(query),
            EntityKind::Arc(a) => a.nearest_point_on_path(query),
            EntityKind::Ellipse(e) => e.nearest_point_on_path(query),
        }
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        match self {
            EntityKind::Line(l) => l.perpendicular_points(from),
            EntityKind::Circle(c) => c.perpendicular_points(from),
            EntityKind::Arc(a) => a.perpendicular_points(from),
            EntityKind::Ellipse(e) => e.perpendicular_points(from),
        }
    }
}

impl Snapable for CadEntity {
    fn snap_candidates(&self) -> Vec<(Point2, SnapKind)> {
        self.kind().snap_candidates()
    }

    fn nearest_point_on_path(&self, query: &Point2) -> Point2 {
        self.kind().nearest_point_on_path(query)
    }

    fn perpendicular_points(&self, from: &Point2) -> Vec<Point2> {
        self.kind().perpendicular_points(from)
    }

    fn snap_points(
        &self,
        query: &Point2,
        min_distance_to_snap: f64,
        max_count: usize,
    ) -> Vec<EntityCoordinate> {
        self.kind()
            .snap_points(query, min_distance_to_snap, max_count)
            .into_iter()
            .map(|c| c.with_entity(self.id()))
            .collect()
    }
}
