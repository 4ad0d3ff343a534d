//! Process-wide UI preferences: language, text direction and theme

use fleetledger_config::{Language, Theme, UiConfig};
use serde::{Deserialize, Serialize};

/// Text direction implied by the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ltr => write!(f, "ltr"),
            Direction::Rtl => write!(f, "rtl"),
        }
    }
}

/// Current language and theme, set once at startup and changed only
/// through the setters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    language: Language,
    theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

impl Preferences {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            language: ui.language,
            theme: ui.theme,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn direction(&self) -> Direction {
        match self.language {
            Language::En => Direction::Ltr,
            Language::Ar => Direction::Rtl,
        }
    }

    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            log::info!("Language changed: {} -> {}", self.language, language);
        }
        self.language = language;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            log::info!("Theme changed: {} -> {}", self.theme, theme);
        }
        self.theme = theme;
    }

    /// Look up a UI label; unknown keys come back unchanged
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.language {
            Language::En => EN,
            Language::Ar => AR,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

const EN: &[(&str, &str)] = &[
    ("nav.dashboard", "Dashboard"),
    ("nav.accounting", "Accounting"),
    ("nav.settings", "Settings"),
    ("accounting.chartOfAccounts", "Chart of Accounts"),
    ("accounting.journalEntry", "Journal Entry"),
    ("accounting.debit", "Debit"),
    ("accounting.credit", "Credit"),
    ("accounting.mustBalance", "Entries must balance"),
    ("accounting.balanced", "Entry is balanced"),
    ("accounting.addAccount", "Add Account"),
    ("accounting.addLine", "Add Line"),
    ("accounting.postEntry", "Post Entry"),
    ("accounting.postedEntries", "Posted Entries"),
    ("accounting.account", "Account"),
    ("accounting.description", "Description"),
    ("accounting.date", "Date"),
    ("accounting.reference", "Reference"),
    ("accounting.entryType", "Entry Type"),
    ("accounting.memo", "Memo"),
    ("accounting.code", "Code"),
    ("accounting.name", "Name"),
    ("accounting.parent", "Parent Group"),
    ("accounting.group", "Group"),
    ("accounting.ledger", "Ledger Account"),
    ("accounting.selectAccount", "Select account"),
    ("accounting.difference", "Difference"),
    ("accounting.reset", "Reset"),
    ("accounting.posted", "Entry posted"),
    ("dashboard.ledgerAccounts", "Ledger Accounts"),
    ("dashboard.journalStatus", "Journal Status"),
    ("settings.configuration", "Configuration"),
    ("settings.server", "Server"),
    ("settings.currency", "Currency"),
    ("settings.preferences", "Preferences"),
    ("common.save", "Save"),
    ("common.cancel", "Cancel"),
    ("common.add", "Add"),
    ("common.delete", "Delete"),
    ("common.total", "Total"),
    ("settings.language", "Language"),
    ("settings.theme", "Theme"),
];

const AR: &[(&str, &str)] = &[
    ("nav.dashboard", "لوحة التحكم"),
    ("nav.accounting", "المحاسبة"),
    ("nav.settings", "الإعدادات"),
    ("accounting.chartOfAccounts", "شجرة الحسابات"),
    ("accounting.journalEntry", "قيد يومية"),
    ("accounting.debit", "مدين"),
    ("accounting.credit", "دائن"),
    ("accounting.mustBalance", "يجب أن تتوازن القيود"),
    ("accounting.balanced", "القيد متوازن"),
    ("accounting.addAccount", "إضافة حساب"),
    ("accounting.addLine", "إضافة سطر"),
    ("accounting.postEntry", "ترحيل القيد"),
    ("accounting.postedEntries", "القيود المرحلة"),
    ("accounting.account", "الحساب"),
    ("accounting.description", "الوصف"),
    ("accounting.date", "التاريخ"),
    ("accounting.reference", "المرجع"),
    ("accounting.entryType", "نوع القيد"),
    ("accounting.memo", "ملاحظات"),
    ("accounting.code", "الرمز"),
    ("accounting.name", "الاسم"),
    ("accounting.parent", "المجموعة الرئيسية"),
    ("accounting.group", "مجموعة"),
    ("accounting.ledger", "حساب فرعي"),
    ("accounting.selectAccount", "اختر الحساب"),
    ("accounting.difference", "الفرق"),
    ("accounting.reset", "إعادة تعيين"),
    ("accounting.posted", "تم ترحيل القيد"),
    ("dashboard.ledgerAccounts", "الحسابات الفرعية"),
    ("dashboard.journalStatus", "حالة القيد"),
    ("settings.configuration", "الإعدادات الحالية"),
    ("settings.server", "الخادم"),
    ("settings.currency", "العملة"),
    ("settings.preferences", "التفضيلات"),
    ("common.save", "حفظ"),
    ("common.cancel", "إلغاء"),
    ("common.add", "إضافة"),
    ("common.delete", "حذف"),
    ("common.total", "الإجمالي"),
    ("settings.language", "اللغة"),
    ("settings.theme", "المظهر"),
];
