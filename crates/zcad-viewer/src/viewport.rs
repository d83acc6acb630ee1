//! 视口
//!
//! 处理缩放以及屏幕坐标与世界坐标的转换，
//! 并给出绘制时使用的可见区域。

use zcad_kernel::math::{BoundingBox2, Point2};

/// 2D视口
#[derive(Debug, Clone)]
pub struct Viewport {
    /// 视口中心位置（世界坐标）
    pub center: Point2,

    /// 缩放级别（像素/单位）
    pub zoom: f64,

    /// 视口宽度（像素）
    pub width: u32,

    /// 视口高度（像素）
    pub height: u32,

    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            center: Point2::origin(),
            zoom: 1.0,
            width,
            height,
            min_zoom: 0.001,
            max_zoom: 10000.0,
        }
    }

    /// 以指定屏幕点为中心缩放
    pub fn zoom_at(&mut self, screen_point: Point2, factor: f64) {
        let world_before = self.screen_to_world(screen_point);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        let world_after = self.screen_to_world(screen_point);
        self.center += world_before - world_after;
    }

    /// 缩放到指定区域
    pub fn zoom_to_fit(&mut self, bbox: &BoundingBox2, padding: f64) {
        let width = bbox.width() + padding * 2.0;
        let height = bbox.height() + padding * 2.0;
        if width <= 0.0 || height <= 0.0 {
            self.center = bbox.center();
            return;
        }

        let zoom_x = self.width as f64 / width;
        let zoom_y = self.height as f64 / height;

        self.zoom = zoom_x.min(zoom_y).clamp(self.min_zoom, self.max_zoom);
        self.center = bbox.center();
    }

    /// 屏幕坐标转世界坐标
    pub fn screen_to_world(&self, screen: Point2) -> Point2 {
        let x = (screen.x - self.width as f64 / 2.0) / self.zoom + self.center.x;
        let y = (self.height as f64 / 2.0 - screen.y) / self.zoom + self.center.y;
        Point2::new(x, y)
    }

    /// 世界坐标转屏幕坐标
    pub fn world_to_screen(&self, world: Point2) -> Point2 {
        let x = (world.x - self.center.x) * self.zoom + self.width as f64 / 2.0;
        let y = self.height as f64 / 2.0 - (world.y - self.center.y) * self.zoom;
        Point2::new(x, y)
    }

    /// 当前可见的世界区域
    pub fn visible_area(&self) -> BoundingBox2 {
        let half_width = self.width as f64 / 2.0 / self.zoom;
        let half_height = self.height as f64 / 2.0 / self.zoom;

        BoundingBox2::new(
            Point2::new(self.center.x - half_width, self.center.y - half_height),
            Point2::new(self.center.x + half_width, self.center.y + half_height),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
