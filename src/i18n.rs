// Localized labels and text rendering of analysis results.
use crate::error::AnalysisError;
use crate::model::{AnalysisResult, Direction, IndicatorSet, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tg,
    Ru,
    Uz,
    Kk,
    En,
}

impl Language {
    pub const ALL: [Language; 5] = [Language::Tg, Language::Ru, Language::Uz, Language::Kk, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Tg => "tg",
            Language::Ru => "ru",
            Language::Uz => "uz",
            Language::Kk => "kk",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim().to_ascii_lowercase();
        Language::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Resolves `code`, falling back to `fallback` when unset or unknown.
    pub fn resolve(code: Option<&str>, fallback: Language) -> Language {
        code.and_then(Language::from_code).unwrap_or(fallback)
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Language::Tg => &TG,
            Language::Ru => &RU,
            Language::Uz => &UZ,
            Language::Kk => &KK,
            Language::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Label table for one language.
#[derive(Debug)]
pub struct Messages {
    pub title: &'static str,
    pub buy: &'static str,
    pub sell: &'static str,
    pub neutral: &'static str,
    pub analyzing: &'static str,
    pub direction: &'static str,
    pub confidence: &'static str,
    pub price: &'static str,
    pub trend: &'static str,
    pub momentum: &'static str,
    pub bands: &'static str,
    pub invalid_symbol: &'static str,
    pub no_data: &'static str,
    pub insufficient_data: &'static str,
    pub analysis_error: &'static str,
}

impl Messages {
    pub fn direction_label(&self, direction: Direction) -> &'static str {
        match direction {
            Direction::Buy => self.buy,
            Direction::Sell => self.sell,
            Direction::Neutral => self.neutral,
        }
    }

    pub fn error_text(&self, err: &AnalysisError) -> &'static str {
        match err {
            AnalysisError::InvalidSymbol { .. } => self.invalid_symbol,
            AnalysisError::DataUnavailable { .. } => self.no_data,
            AnalysisError::InsufficientData { .. } => self.insufficient_data,
            AnalysisError::Analysis { .. } => self.analysis_error,
        }
    }
}

static TG: Messages = Messages {
    title: "Таҳлили бозор",
    buy: "ХАРИД",
    sell: "ФУРӮШ",
    neutral: "БЕТАРАФ",
    analyzing: "Бозор таҳлил карда мешавад...",
    direction: "Сигнал",
    confidence: "Боварӣ",
    price: "Нарх",
    trend: "Тамоюл (EMA)",
    momentum: "RSI",
    bands: "Bollinger",
    invalid_symbol: "Ин ҷуфти асъор дастгирӣ намешавад. Ҷуфти дигарро интихоб кунед.",
    no_data: "Ҳоло барои ин ҷуфт маълумот нест. Лутфан, баъдтар кӯшиш кунед.",
    insufficient_data: "Маълумот барои таҳлил кофӣ нест. Лутфан, баъдтар кӯшиш кунед.",
    analysis_error: "Ҳангоми таҳлил хатогӣ рух дод.",
};

static RU: Messages = Messages {
    title: "Анализ рынка",
    buy: "ПОКУПКА",
    sell: "ПРОДАЖА",
    neutral: "НЕЙТРАЛЬНО",
    analyzing: "Анализируем рынок...",
    direction: "Сигнал",
    confidence: "Уверенность",
    price: "Цена",
    trend: "Тренд (EMA)",
    momentum: "RSI",
    bands: "Боллинджер",
    invalid_symbol: "Эта валютная пара не поддерживается. Выберите другую пару.",
    no_data: "Сейчас нет данных по этой паре. Попробуйте позже.",
    insufficient_data: "Недостаточно данных для анализа. Попробуйте позже.",
    analysis_error: "Ошибка при анализе рынка.",
};

static UZ: Messages = Messages {
    title: "Bozor tahlili",
    buy: "SOTIB OLISH",
    sell: "SOTISH",
    neutral: "NEYTRAL",
    analyzing: "Bozor tahlil qilinmoqda...",
    direction: "Signal",
    confidence: "Ishonch",
    price: "Narx",
    trend: "Trend (EMA)",
    momentum: "RSI",
    bands: "Bollinger",
    invalid_symbol: "Bu valyuta juftligi qo'llab-quvvatlanmaydi. Boshqa juftlikni tanlang.",
    no_data: "Hozir bu juftlik bo'yicha ma'lumot yo'q. Keyinroq urinib ko'ring.",
    insufficient_data: "Tahlil uchun ma'lumot yetarli emas. Keyinroq urinib ko'ring.",
    analysis_error: "Tahlil paytida xatolik yuz berdi.",
};

static KK: Messages = Messages {
    title: "Нарық талдауы",
    buy: "САТЫП АЛУ",
    sell: "САТУ",
    neutral: "БЕЙТАРАП",
    analyzing: "Нарық талдануда...",
    direction: "Сигнал",
    confidence: "Сенімділік",
    price: "Баға",
    trend: "Тренд (EMA)",
    momentum: "RSI",
    bands: "Боллинджер",
    invalid_symbol: "Бұл валюта жұбына қолдау көрсетілмейді. Басқа жұпты таңдаңыз.",
    no_data: "Қазір бұл жұп бойынша деректер жоқ. Кейінірек қайталаңыз.",
    insufficient_data: "Талдау үшін деректер жеткіліксіз. Кейінірек қайталаңыз.",
    analysis_error: "Талдау кезінде қате орын алды.",
};

static EN: Messages = Messages {
    title: "Market analysis",
    buy: "BUY",
    sell: "SELL",
    neutral: "NEUTRAL",
    analyzing: "Analyzing the market...",
    direction: "Signal",
    confidence: "Confidence",
    price: "Price",
    trend: "Trend (EMA)",
    momentum: "RSI",
    bands: "Bollinger",
    invalid_symbol: "This currency pair is not supported. Please pick another pair.",
    no_data: "No data for this pair right now. Please try again later.",
    insufficient_data: "Not enough data to analyze this pair yet. Please try again later.",
    analysis_error: "An error occurred while analyzing the market.",
};

/// Decimal places used for price readouts, based on price magnitude.
fn price_precision(price: f64) -> usize {
    if price.abs() >= 20.0 { 3 } else { 5 }
}

/// Renders a signal for `label`, usually the pair's display name.
pub fn format_signal(label: &str, signal: &Signal, indicators: &IndicatorSet, lang: Language) -> String {
    let m = lang.messages();
    let p = price_precision(indicators.last_close);
    format!(
        "📊 {title}: {label}\n\n\
         🎯 {dir_label}: {dir}\n\
         📈 {conf_label}: {conf:.1}%\n\n\
         💰 {price_label}: {close:.p$}\n\
         〽️ {trend_label}: {fast:.p$} / {slow:.p$}\n\
         ⚡ {mom_label}: {rsi:.1}\n\
         📉 {bands_label}: {lower:.p$} – {upper:.p$}",
        title = m.title,
        label = label,
        dir_label = m.direction,
        dir = m.direction_label(signal.direction),
        conf_label = m.confidence,
        conf = signal.confidence,
        price_label = m.price,
        close = indicators.last_close,
        trend_label = m.trend,
        fast = indicators.ema_fast,
        slow = indicators.ema_slow,
        mom_label = m.momentum,
        rsi = indicators.rsi,
        bands_label = m.bands,
        lower = indicators.bb_lower,
        upper = indicators.bb_upper,
        p = p,
    )
}

pub fn format_error(err: &AnalysisError, lang: Language) -> String {
    format!("❌ {}", lang.messages().error_text(err))
}

/// Renders a result in `lang`, independent of the language it was produced in.
pub fn format_result(result: &AnalysisResult, lang: Language) -> String {
    match (&result.error, &result.signal, &result.indicators) {
        (Some(err), _, _) => format_error(err, lang),
        (None, Some(signal), Some(indicators)) => format_signal(&result.label, signal, indicators, lang),
        _ => format_error(&AnalysisError::analysis("result carries no signal"), lang),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> (Signal, IndicatorSet) {
        let signal = Signal {
            direction: Direction::Buy,
            confidence: 72.35,
            supporting_indicators: BTreeMap::new(),
        };
        let indicators = IndicatorSet {
            ema_fast: 1.08512,
            ema_slow: 1.08401,
            macd: 0.00111,
            rsi: 61.2,
            bb_upper: 1.0870,
            bb_middle: 1.0850,
            bb_lower: 1.0830,
            last_close: 1.0855,
        };
        (signal, indicators)
    }

    #[test]
    fn codes_resolve_case_insensitively() {
        assert_eq!(Language::from_code("RU"), Some(Language::Ru));
        assert_eq!(Language::from_code(" kk "), Some(Language::Kk));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(Language::resolve(Some("fr"), Language::Tg), Language::Tg);
        assert_eq!(Language::resolve(None, Language::En), Language::En);
        assert_eq!(Language::resolve(Some("uz"), Language::Tg), Language::Uz);
    }

    #[test]
    fn formats_in_every_language() {
        let (signal, indicators) = sample();
        for lang in Language::ALL {
            let text = format_signal("EURUSD=X", &signal, &indicators, lang);
            assert!(text.contains(lang.messages().buy), "{lang}: {text}");
            assert!(text.contains("72.3") || text.contains("72.4"));
            assert!(text.contains("1.08550"));
        }
    }

    #[test]
    fn every_language_has_progress_text() {
        for lang in Language::ALL {
            assert!(!lang.messages().analyzing.is_empty(), "{}", lang.code());
        }
        assert_eq!(Language::En.messages().analyzing, "Analyzing the market...");
    }

    #[test]
    fn error_text_distinguishes_invalid_symbol_from_no_data() {
        let invalid = format_error(&AnalysisError::InvalidSymbol { symbol: "X".into() }, Language::En);
        let missing = format_error(&AnalysisError::data_unavailable("timeout"), Language::En);
        assert_ne!(invalid, missing);
        assert!(invalid.contains("not supported"));
        assert!(missing.contains("try again"));
    }

    #[test]
    fn high_priced_pairs_use_fewer_decimals() {
        let (signal, mut indicators) = sample();
        indicators.last_close = 151.2345;
        let text = format_signal("USDJPY=X", &signal, &indicators, Language::En);
        assert!(text.contains("151.234") || text.contains("151.235"));
    }
}
