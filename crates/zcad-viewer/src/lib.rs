//! ZCAD 绘制适配层
//!
//! 把内核实体转换为 [`Painter`] 路径命令。
//!
//! - 圆弧按方向选择 `arc` / `arc_negative`
//! - 包围盒不在可见区域内的实体不绘制
//! - 可选地按屏幕半径剔除过小的曲线（见 [`RenderConfig::min_screen_radius`]）

pub mod config;
pub mod items;
pub mod painter;
pub mod recording;
pub mod viewport;

pub use config::RenderConfig;
pub use items::{draw_entity, draw_item_for, draw_snap_indicator, DrawItem};
pub use painter::{DrawOptions, Painter};
pub use recording::{PainterCall, RecordingPainter};
pub use viewport::Viewport;
