//! 页面检测结果
//!
//! 每轮检测生成一份新的结果，用完即弃

use serde::Serialize;

/// 单个按钮的检测信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonInfo {
    /// 按钮所在容器的序号（从0开始，按文档顺序）
    pub index: usize,
    /// 去除首尾空白后的按钮文字，保留原始大小写
    pub text: String,
    /// 是否带有 disabled 属性
    pub disabled: bool,
}

impl ButtonInfo {
    /// 面向用户的位置编号（从1开始）
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// 归一化后的按钮文字
    pub fn normalized_text(&self) -> String {
        self.text.to_lowercase()
    }
}

/// 单轮检测结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// 本轮按文档顺序检查过的按钮，找到可用按钮后不再继续
    pub buttons: Vec<ButtonInfo>,
    /// 是否找到可点击的预约按钮
    pub found_active: bool,
    /// 抓取失败时的错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// 创建抓取失败的结果
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// 找到的可用按钮
    pub fn active_button(&self) -> Option<&ButtonInfo> {
        if self.found_active {
            self.buttons.last()
        } else {
            None
        }
    }

    /// 本轮检测是否失败
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
