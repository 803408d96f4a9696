// ==========================================
// 库存监控驾驶舱 - 拖拽重排
// ==========================================
// 职责: 指针/触摸/键盘手势 → 逻辑拖拽事件 → 手工顺序提交
// 红线: 仅垂直移动；同一手势至多提交一次
// ==========================================

mod controller;
mod gesture;


pub use controller::{ReorderController, ReorderOutcome};
pub use gesture::{
    DragEvent, GestureOrigin, GestureSource, Key, KeyInput, KeyboardSource, PointerInput,
    PointerSource, RowBox, RowLayout, TouchSource,
};
