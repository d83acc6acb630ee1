//! 实体绘制适配器
//!
//! 每种图元对应一个借用几何数据的绘制项，负责剔除判断和路径输出。
//! 绘制项本身不持有几何。

use crate::painter::{DrawOptions, Painter};
use tracing::debug;
use zcad_kernel::entity::{CadEntity, EntityKind};
use zcad_kernel::geometry::{Arc, Circle, Ellipse, Line};
use zcad_kernel::math::{BoundingBox2, Point2, Vector2};
use zcad_kernel::meta::MetaTypes;
use zcad_kernel::snap::{EntityCoordinate, SnapKind};

/// 可绘制项
pub trait DrawItem {
    /// 世界坐标下的包围盒
    fn bounding_box(&self) -> BoundingBox2;

    /// 输出路径（不描边）
    fn trace(&self, painter: &mut dyn Painter, options: &DrawOptions);

    /// 在屏幕上过小而无需绘制
    fn too_small(&self, _scale: f64, _options: &DrawOptions) -> bool {
        false
    }

    /// 与可见区域相交且屏幕尺寸足够
    fn is_visible(&self, area: &BoundingBox2, scale: f64, options: &DrawOptions) -> bool {
        self.bounding_box().intersects(area) && !self.too_small(scale, options)
    }

    /// 绘制到画笔，返回是否实际绘制
    fn draw(&self, painter: &mut dyn Painter, options: &DrawOptions, area: &BoundingBox2) -> bool {
        if !self.is_visible(area, painter.scale(), options) {
            return false;
        }
        self.trace(painter, options);
        painter.stroke();
        true
    }
}

fn below_min_radius(radius: f64, scale: f64, options: &DrawOptions) -> bool {
    match options.min_screen_radius {
        Some(min) => radius * scale < min,
        None => false,
    }
}

pub struct LineItem<'a>(pub &'a Line);

impl DrawItem for LineItem<'_> {
    fn bounding_box(&self) -> BoundingBox2 {
        self.0.bounding_box()
    }

    fn trace(&self, painter: &mut dyn Painter, _options: &DrawOptions) {
        painter.move_to(&self.0.start());
        painter.line_to(&self.0.end());
    }
}

pub struct CircleItem<'a>(pub &'a Circle);

impl DrawItem for CircleItem<'_> {
    fn bounding_box(&self) -> BoundingBox2 {
        self.0.bounding_box()
    }

    fn trace(&self, painter: &mut dyn Painter, _options: &DrawOptions) {
        let c = self.0.center();
        painter.move_to(&self.0.point_at_angle(0.0));
        painter.arc(&c, self.0.radius(), 0.0, std::f64::consts::TAU);
    }

    fn too_small(&self, scale: f64, options: &DrawOptions) -> bool {
        below_min_radius(self.0.radius(), scale, options)
    }
}

/// 圆弧：逆时针使用 `arc`，顺时针使用 `arc_negative`
pub struct ArcItem<'a>(pub &'a Arc);

impl DrawItem for ArcItem<'_> {
    fn bounding_box(&self) -> BoundingBox2 {
        self.0.bounding_box()
    }

    fn trace(&self, painter: &mut dyn Painter, _options: &DrawOptions) {
        let arc = self.0;
        let start = arc.start_angle();
        // 终止角由扫掠角推出，整圆弧的起止角相等
        painter.move_to(&arc.start_point());
        if arc.is_ccw() {
            painter.arc(&arc.center(), arc.radius(), start, start + arc.sweep_angle());
        } else {
            painter.arc_negative(&arc.center(), arc.radius(), start, start - arc.sweep_angle());
        }
    }

    fn too_small(&self, scale: f64, options: &DrawOptions) -> bool {
        below_min_radius(self.0.radius(), scale, options)
    }
}

pub struct EllipseItem<'a>(pub &'a Ellipse);

impl DrawItem for EllipseItem<'_> {
    fn bounding_box(&self) -> BoundingBox2 {
        self.0.bounding_box()
    }

    fn trace(&self, painter: &mut dyn Painter, options: &DrawOptions) {
        painter.ellipse(self.0, options.ellipse_segments);
    }

    fn too_small(&self, scale: f64, options: &DrawOptions) -> bool {
        below_min_radius(self.0.major_radius(), scale, options)
    }
}

/// 几何对应的绘制项
pub fn draw_item_for(kind: &EntityKind) -> Box<dyn DrawItem + '_> {
    match kind {
        EntityKind::Line(l) => Box::new(LineItem(l)),
        EntityKind::Circle(c) => Box::new(CircleItem(c)),
        EntityKind::Arc(a) => Box::new(ArcItem(a)),
        EntityKind::Ellipse(e) => Box::new(EllipseItem(e)),
    }
}

fn apply_style(painter: &mut dyn Painter, metas: &MetaTypes, options: &DrawOptions) {
    let color = if options.selected {
        options.selection_color
    } else {
        metas.color().unwrap_or(options.default_color)
    };
    painter.set_color(color);
    if let Some(width) = metas.line_width() {
        painter.set_line_width(width.to_pixels());
    }
}

/// 按实体的元属性设置样式后绘制，返回是否实际绘制
pub fn draw_entity(
    entity: &CadEntity,
    painter: &mut dyn Painter,
    options: &DrawOptions,
    area: &BoundingBox2,
) -> bool {
    let item = draw_item_for(entity.kind());
    if !item.is_visible(area, painter.scale(), options) {
        debug!(id = entity.id().id, scale = painter.scale(), "entity culled");
        return false;
    }
    apply_style(painter, entity.metas(), options);
    item.trace(painter, options);
    painter.stroke();
    true
}

/// 绘制捕捉标记
///
/// 标记尺寸以像素给出，按画笔缩放换算到世界坐标。
pub fn draw_snap_indicator(painter: &mut dyn Painter, coord: &EntityCoordinate, options: &DrawOptions) {
    let scale = painter.scale();
    if scale <= 0.0 {
        return;
    }
    let h = options.snap_marker_size / scale / 2.0;
    let p = coord.point;
    let at = |dx: f64, dy: f64| p + Vector2::new(dx * h, dy * h);

    painter.set_color(options.selection_color);
    match coord.kind {
        SnapKind::Endpoint => polygon(painter, &[at(-1.0, -1.0), at(1.0, -1.0), at(1.0, 1.0), at(-1.0, 1.0)]),
        SnapKind::Midpoint => polygon(painter, &[at(-1.0, -1.0), at(1.0, -1.0), at(0.0, 1.0)]),
        SnapKind::Center => {
            painter.move_to(&at(1.0, 0.0));
            painter.arc(&p, h, 0.0, std::f64::consts::TAU);
        }
        SnapKind::Quadrant => polygon(painter, &[at(0.0, -1.0), at(1.0, 0.0), at(0.0, 1.0), at(-1.0, 0.0)]),
        SnapKind::Intersection => {
            segment(painter, at(-1.0, -1.0), at(1.0, 1.0));
            segment(painter, at(-1.0, 1.0), at(1.0, -1.0));
        }
        SnapKind::Perpendicular => {
            segment(painter, at(-1.0, -1.0), at(1.0, -1.0));
            segment(painter, at(0.0, -1.0), at(0.0, 1.0));
        }
        SnapKind::Nearest => {
            polygon(painter, &[at(-1.0, 1.0), at(1.0, 1.0), at(-1.0, -1.0), at(1.0, -1.0)])
        }
    }
    painter.stroke();
}

fn segment(painter: &mut dyn Painter, from: Point2, to: Point2) {
    painter.move_to(&from);
    painter.line_to(&to);
}

fn polygon(painter: &mut dyn Painter, points: &[Point2]) {
    if let Some((first, rest)) = points.split_first() {
        painter.move_to(first);
        for p in rest {
            painter.line_to(p);
        }
        painter.line_to(first);
    }
}
