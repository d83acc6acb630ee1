//! 绘制配置

use crate::painter::DrawOptions;
use serde::{Deserialize, Serialize};

/// 绘制配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 曲线最小屏幕半径（像素），为空时不按尺寸剔除
    pub min_screen_radius: Option<f64>,
    /// 椭圆折线化段数
    pub ellipse_segments: usize,
    /// 捕捉标记尺寸（像素）
    pub snap_marker_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_screen_radius: None,
            ellipse_segments: 64,
            snap_marker_size: 8.0,
        }
    }
}

impl RenderConfig {
    /// 按配置生成绘制选项
    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            min_screen_radius: self.min_screen_radius,
            ellipse_segments: self.ellipse_segments,
            snap_marker_size: self.snap_marker_size,
            ..DrawOptions::default()
        }
    }
}
