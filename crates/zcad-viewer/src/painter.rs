//! 画笔接口
//!
//! 绘制适配器只通过 [`Painter`] 输出路径，不关心具体的绘图后端。
//! 所有坐标均为世界坐标，`scale` 给出当前的像素/单位比例。

use zcad_kernel::geometry::Ellipse;
use zcad_kernel::math::Point2;
use zcad_kernel::meta::Color;

/// 绘图后端
pub trait Painter {
    /// 开始新的子路径
    fn move_to(&mut self, p: &Point2);

    /// 从当前点画直线
    fn line_to(&mut self, p: &Point2);

    /// 逆时针圆弧（角度增加方向）
    fn arc(&mut self, center: &Point2, radius: f64, start_angle: f64, end_angle: f64);

    /// 顺时针圆弧（角度减少方向）
    fn arc_negative(&mut self, center: &Point2, radius: f64, start_angle: f64, end_angle: f64);

    /// 描边并清空当前路径
    fn stroke(&mut self);

    /// 当前缩放（像素/单位）
    fn scale(&self) -> f64;

    /// 设置描边颜色
    fn set_color(&mut self, _color: Color) {}

    /// 设置描边线宽（像素）
    fn set_line_width(&mut self, _width: f64) {}

    /// 椭圆（弧）路径，默认按参数均匀折线化
    fn ellipse(&mut self, ellipse: &Ellipse, segments: usize) {
        let points = ellipse.sample_points(segments);
        if let Some((first, rest)) = points.split_first() {
            self.move_to(first);
            for p in rest {
                self.line_to(p);
            }
        }
    }
}

/// 绘制选项
///
/// 由调用方传入，适配器原样使用，不做持久化。
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    /// 捕捉标记尺寸（像素）
    pub snap_marker_size: f64,
    /// 是否以选中状态绘制
    pub selected: bool,
    /// 选中时的颜色
    pub selection_color: Color,
    /// 未设置颜色属性时的默认颜色
    pub default_color: Color,
    /// 椭圆折线化的段数
    pub ellipse_segments: usize,
    /// 屏幕半径低于该值（像素）的曲线不绘制，`None` 表示总是绘制
    pub min_screen_radius: Option<f64>,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            snap_marker_size: 8.0,
            selected: false,
            selection_color: Color::from_hex(0x00A2FF),
            default_color: Color::WHITE,
            ellipse_segments: 64,
            min_screen_radius: None,
        }
    }
}

impl DrawOptions {
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}
