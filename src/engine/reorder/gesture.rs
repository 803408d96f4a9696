// ==========================================
// 库存监控驾驶舱 - 拖拽手势源
// ==========================================
// 职责: 把指针/触摸/键盘原始输入翻译为统一的逻辑拖拽事件
// 红线: 仅垂直方向，水平位移一律忽略
// 红线: 指针/触摸拖拽只能从拖拽手柄发起
// ==========================================

use serde::{Deserialize, Serialize};

/// 手势来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureOrigin {
    Pointer,
    Touch,
    Keyboard,
}

/// 逻辑拖拽事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { id: String, origin: GestureOrigin },
    Move { over_id: Option<String> },
    End { over_id: Option<String> },
    Cancel,
}

// ==========================================
// RowLayout - 行布局（碰撞检测用）
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl RowBox {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// 当前渲染行的垂直布局（自上而下）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    rows: Vec<RowBox>,
}

impl RowLayout {
    pub fn new(rows: Vec<RowBox>) -> Self {
        Self { rows }
    }

    /// 等高行布局
    pub fn uniform<I, S>(ids: I, top: f64, row_height: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| RowBox {
                id: id.into(),
                top: top + i as f64 * row_height,
                height: row_height,
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// 最近中心碰撞：垂直中心距 y 最近的行
    pub fn closest_center(&self, y: f64) -> Option<&str> {
        self.rows
            .iter()
            .filter(|r| r.center_y().is_finite())
            .min_by(|a, b| {
                (a.center_y() - y)
                    .abs()
                    .total_cmp(&(b.center_y() - y).abs())
            })
            .map(|r| r.id.as_str())
    }

    /// 相邻行（offset 为负向上）；越界时停在边界
    pub fn neighbor(&self, id: &str, offset: isize) -> Option<&str> {
        let pos = self.rows.iter().position(|r| r.id == id)?;
        let last = self.rows.len().saturating_sub(1) as isize;
        let target = (pos as isize + offset).clamp(0, last) as usize;
        self.rows.get(target).map(|r| r.id.as_str())
    }
}

// ==========================================
// GestureSource - 手势源能力
// ==========================================

/// 原始输入 → 逻辑拖拽事件
pub trait GestureSource {
    type Input;

    fn origin(&self) -> GestureOrigin;

    /// 返回 None 表示该输入不产生逻辑事件
    fn translate(&mut self, input: Self::Input, layout: &RowLayout) -> Option<DragEvent>;
}

/// 指针类输入（鼠标 / 触摸共用）
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Down {
        row_id: String,
        on_handle: bool,
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Cancel,
}

/// 指针跟踪（x 坐标保留在输入里但从不参与判定）
#[derive(Debug, Default)]
struct PointerTracker {
    dragging: bool,
}

impl PointerTracker {
    fn translate(
        &mut self,
        input: PointerInput,
        layout: &RowLayout,
        origin: GestureOrigin,
    ) -> Option<DragEvent> {
        match input {
            PointerInput::Down {
                row_id, on_handle, ..
            } => {
                if self.dragging || !on_handle || !layout.contains(&row_id) {
                    return None;
                }
                self.dragging = true;
                Some(DragEvent::Start { id: row_id, origin })
            }
            PointerInput::Move { y, .. } => {
                if !self.dragging {
                    return None;
                }
                Some(DragEvent::Move {
                    over_id: layout.closest_center(y).map(str::to_string),
                })
            }
            PointerInput::Up { y, .. } => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                Some(DragEvent::End {
                    over_id: layout.closest_center(y).map(str::to_string),
                })
            }
            PointerInput::Cancel => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                Some(DragEvent::Cancel)
            }
        }
    }
}

/// 鼠标指针
#[derive(Debug, Default)]
pub struct PointerSource {
    tracker: PointerTracker,
}

impl PointerSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GestureSource for PointerSource {
    type Input = PointerInput;

    fn origin(&self) -> GestureOrigin {
        GestureOrigin::Pointer
    }

    fn translate(&mut self, input: PointerInput, layout: &RowLayout) -> Option<DragEvent> {
        self.tracker.translate(input, layout, GestureOrigin::Pointer)
    }
}

/// 触摸
#[derive(Debug, Default)]
pub struct TouchSource {
    tracker: PointerTracker,
}

impl TouchSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GestureSource for TouchSource {
    type Input = PointerInput;

    fn origin(&self) -> GestureOrigin {
        GestureOrigin::Touch
    }

    fn translate(&mut self, input: PointerInput, layout: &RowLayout) -> Option<DragEvent> {
        self.tracker.translate(input, layout, GestureOrigin::Touch)
    }
}

// ==========================================
// 键盘
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    /// 当前获得焦点的行（拖拽手柄所在行）
    pub focused_row: Option<String>,
}

impl KeyInput {
    pub fn new(key: Key, focused_row: Option<&str>) -> Self {
        Self {
            key,
            focused_row: focused_row.map(str::to_string),
        }
    }
}

/// 键盘拖拽：空格/回车拾起与放下，上下方向键移动，Esc 取消
#[derive(Debug, Default)]
pub struct KeyboardSource {
    target: Option<String>,
    dragging: bool,
}

impl KeyboardSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GestureSource for KeyboardSource {
    type Input = KeyInput;

    fn origin(&self) -> GestureOrigin {
        GestureOrigin::Keyboard
    }

    fn translate(&mut self, input: KeyInput, layout: &RowLayout) -> Option<DragEvent> {
        match input.key {
            Key::Space | Key::Enter => {
                if self.dragging {
                    self.dragging = false;
                    return Some(DragEvent::End {
                        over_id: self.target.take(),
                    });
                }
                let id = input.focused_row.filter(|id| layout.contains(id))?;
                self.dragging = true;
                self.target = Some(id.clone());
                Some(DragEvent::Start {
                    id,
                    origin: GestureOrigin::Keyboard,
                })
            }
            Key::ArrowUp | Key::ArrowDown => {
                if !self.dragging {
                    return None;
                }
                let offset = if input.key == Key::ArrowUp { -1 } else { 1 };
                let next = self
                    .target
                    .as_deref()
                    .and_then(|cur| layout.neighbor(cur, offset))
                    .map(str::to_string);
                if next.is_some() {
                    self.target = next;
                }
                Some(DragEvent::Move {
                    over_id: self.target.clone(),
                })
            }
            Key::ArrowLeft | Key::ArrowRight => None,
            Key::Escape => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                self.target = None;
                Some(DragEvent::Cancel)
            }
        }
    }
}
