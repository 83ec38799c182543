#[cfg(all(feature = "zh", feature = "en"))]
compile_error!("Cannot enable both 'zh' and 'en' features at the same time");

use std::fmt::Display;

#[cfg(not(feature = "en"))]
mod zh {
    use super::Display;

    pub const BILL_CREATED: &str = "✅ 账单创建成功！";
    pub const ID: &str = "ID";
    pub const AMOUNT: &str = "金额";
    pub const PARTICIPANTS: &str = "参与人";
    pub const PER_PERSON: &str = "每人";
    pub const DESCRIPTION: &str = "描述";
    pub const REMAINDER: &str = "尾差（付款人承担）";
    pub const TIME: &str = "时间";
    pub const DEBTS: &str = "债务：";
    pub const NO_DEBTS: &str = "（无人欠款）";
    pub const STATUS_PENDING: &str = "🔴 待清账";
    pub const STATUS_CLEARED: &str = "🟢 已清账";
    pub const DEFAULT_DESCRIPTION: &str = "日常消费";
    pub const FILTER_PENDING: &str = "待清账";
    pub const FILTER_CLEARED: &str = "已清账";
    pub const INVALID_AMOUNT: &str = "金额错误！请输入正数";
    pub const AMOUNT_TOO_LARGE: &str = "金额过大！单笔不能超过 1000000000000000";
    pub const PERSISTENCE_WARNING: &str = "⚠️ 数据保存失败，本次更改重启后可能丢失";

    pub fn money(amount: impl Display) -> String {
        format!("{amount}元")
    }

    pub fn field(label: &str, value: impl Display) -> String {
        format!("{label}：{value}")
    }

    pub fn debt_line(debtor: &str, creditor: &str, amount: impl Display) -> String {
        format!("👉 {debtor} → {creditor}：{}", money(amount))
    }

    pub fn fallback_name(id_prefix: &str) -> String {
        format!("用户{id_prefix}")
    }

    pub fn next_steps(prefix: &str, bill_id: impl Display) -> String {
        format!("操作：{prefix} 查 | {prefix} 清账 {bill_id}")
    }

    pub fn list_header(pending: usize) -> String {
        format!("📊 账单列表（待清账：{pending}）")
    }

    pub fn no_bills(prefix: &str) -> String {
        format!("暂无账单！创建：{prefix} 陈 100")
    }

    pub fn no_bills_with_status(status: &str, pending: usize) -> String {
        format!("暂无{status}账单（当前待清账：{pending}笔）")
    }

    pub fn detail_header(bill_id: impl Display) -> String {
        format!("📊 账单{bill_id}明细")
    }

    pub fn cleared_by(name: &str, time: impl Display) -> String {
        format!("清账人：{name} | 清账时间：{time}")
    }

    pub fn bill_cleared(bill_id: impl Display) -> String {
        format!("✅ 账单{bill_id}已标记清账！")
    }

    pub fn already_cleared(bill_id: impl Display) -> String {
        format!("账单{bill_id}已清账！")
    }

    pub fn not_found(bill_id: impl Display, prefix: &str) -> String {
        format!("未找到账单{bill_id}！{prefix} 查")
    }

    pub fn create_usage(prefix: &str) -> String {
        format!("格式错误！示例：{prefix} 陈 100 或 {prefix} 张三 李四 600 聚餐")
    }

    pub fn detail_usage(prefix: &str) -> String {
        format!("用法：{prefix} 对账 [账单ID] | 示例：{prefix} 对账 abc123")
    }

    pub fn clear_usage(prefix: &str) -> String {
        format!("用法：{prefix} 清账 [账单ID] | 示例：{prefix} 清账 abc123")
    }

    pub fn unknown_filter(filter: &str, prefix: &str) -> String {
        format!("未知筛选条件：{filter}。用法：{prefix} 查 [待清账|已清账|全部]")
    }

    pub fn help(prefix: &str) -> String {
        format!(
            "📋 AA记账帮助\n\
             1. 创建：{prefix} [人] [金额] [描述]\n   \
             示例：{prefix} 陈 100 | {prefix} 张三 李四 600 聚餐\n\
             2. 查账单：{prefix} 查 [待清账|已清账]\n\
             3. 对账：{prefix} 对账 [ID]\n\
             4. 清账：{prefix} 清账 [ID]\n\
             5. 帮助：{prefix} 帮助"
        )
    }
}

#[cfg(feature = "en")]
mod en {
    use super::Display;

    pub const BILL_CREATED: &str = "✅ Bill created!";
    pub const ID: &str = "ID";
    pub const AMOUNT: &str = "Amount";
    pub const PARTICIPANTS: &str = "Participants";
    pub const PER_PERSON: &str = "Each";
    pub const DESCRIPTION: &str = "Description";
    pub const REMAINDER: &str = "Remainder (kept by payer)";
    pub const TIME: &str = "Time";
    pub const DEBTS: &str = "Debts:";
    pub const NO_DEBTS: &str = "(nobody owes anything)";
    pub const STATUS_PENDING: &str = "🔴 Pending";
    pub const STATUS_CLEARED: &str = "🟢 Cleared";
    pub const DEFAULT_DESCRIPTION: &str = "Daily expense";
    pub const FILTER_PENDING: &str = "pending";
    pub const FILTER_CLEARED: &str = "cleared";
    pub const INVALID_AMOUNT: &str = "Invalid amount! Please enter a positive number";
    pub const AMOUNT_TOO_LARGE: &str = "Amount too large! A bill cannot exceed 1000000000000000";
    pub const PERSISTENCE_WARNING: &str =
        "⚠️ Saving failed; this change may not survive a restart";

    pub fn money(amount: impl Display) -> String {
        format!("¥{amount}")
    }

    pub fn field(label: &str, value: impl Display) -> String {
        format!("{label}: {value}")
    }

    pub fn debt_line(debtor: &str, creditor: &str, amount: impl Display) -> String {
        format!("👉 {debtor} → {creditor}: {}", money(amount))
    }

    pub fn fallback_name(id_prefix: &str) -> String {
        format!("User{id_prefix}")
    }

    pub fn next_steps(prefix: &str, bill_id: impl Display) -> String {
        format!("Next: {prefix} list | {prefix} clear {bill_id}")
    }

    pub fn list_header(pending: usize) -> String {
        format!("📊 Bills ({pending} pending)")
    }

    pub fn no_bills(prefix: &str) -> String {
        format!("No bills yet! Create one: {prefix} Chen 100")
    }

    pub fn no_bills_with_status(status: &str, pending: usize) -> String {
        format!("No {status} bills ({pending} pending)")
    }

    pub fn detail_header(bill_id: impl Display) -> String {
        format!("📊 Bill {bill_id}")
    }

    pub fn cleared_by(name: &str, time: impl Display) -> String {
        format!("Cleared by {name} at {time}")
    }

    pub fn bill_cleared(bill_id: impl Display) -> String {
        format!("✅ Bill {bill_id} marked as cleared!")
    }

    pub fn already_cleared(bill_id: impl Display) -> String {
        format!("Bill {bill_id} is already cleared!")
    }

    pub fn not_found(bill_id: impl Display, prefix: &str) -> String {
        format!("Bill {bill_id} not found! Try {prefix} list")
    }

    pub fn create_usage(prefix: &str) -> String {
        format!("Invalid format! Example: {prefix} Chen 100 or {prefix} Alice Bob 600 dinner")
    }

    pub fn detail_usage(prefix: &str) -> String {
        format!("Usage: {prefix} detail [bill ID] | Example: {prefix} detail abc123")
    }

    pub fn clear_usage(prefix: &str) -> String {
        format!("Usage: {prefix} clear [bill ID] | Example: {prefix} clear abc123")
    }

    pub fn unknown_filter(filter: &str, prefix: &str) -> String {
        format!("Unknown filter '{filter}'. Usage: {prefix} list [pending|cleared|all]")
    }

    pub fn help(prefix: &str) -> String {
        format!(
            "📋 AA split help\n\
             1. Create: {prefix} [people] [amount] [description]\n   \
             Example: {prefix} Chen 100 | {prefix} Alice Bob 600 dinner\n\
             2. List: {prefix} list [pending|cleared]\n\
             3. Detail: {prefix} detail [ID]\n\
             4. Clear: {prefix} clear [ID]\n\
             5. Help: {prefix} help"
        )
    }
}

#[cfg(feature = "en")]
pub use en::*;
#[cfg(not(feature = "en"))]
pub use zh::*;

/// Separator line used between list entries.
pub const RULE: &str = "----------------------------------------";
