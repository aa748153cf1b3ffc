//! Telegram bot: operator commands and report rendering.

use crate::format::{format_date, format_money, parse_amount};
use crate::store::{RulesStore, StoreError};
use caucion_engine::{best_quotes_by_maturity, simulate_placement, Report};
use caucion_feeds::{BymaClient, FeedConfig, FeedError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}

/// Bot commands. All replies are Spanish, HTML parse mode.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Comandos disponibles:")]
pub enum Command {
    #[command(description = "Muestra esta ayuda")]
    Help,
    #[command(description = "Lista los umbrales cargados")]
    Thresholds,
    #[command(description = "Setea un umbral. Uso: /set [regla] <dias> <umbral>")]
    Set(String),
    #[command(description = "Elimina un umbral. Uso: /unset [regla] <dias>")]
    Unset(String),
    #[command(description = "Simula una colocación. Uso: /calc <monto> <dias> [tasa]")]
    Calc(String),
    #[command(description = "Muestra los costos configurados")]
    Fees,
    #[command(description = "Resumen de las reglas de capital")]
    Rules,
}

const HELP_TEXT: &str = "<b>Comandos disponibles</b>\n\
• /thresholds\n\
• /set [regla] &lt;dias&gt; &lt;umbral&gt;\n\
• /unset [regla] &lt;dias&gt;\n\
• /calc &lt;monto&gt; &lt;dias&gt; [tasa]\n\
• /fees\n\
• /rules\n\
\n\
Ejemplos:\n\
• /set 7 55\n\
• /calc 3000000 7\n\
• /calc 3000000 7 60";

/// Telegram bot wrapper bound to one operator chat.
pub struct TelegramBot {
    bot: Bot,
    chat_id: ChatId,
    rules: RulesStore,
    feed: FeedConfig,
}

impl TelegramBot {
    /// Create a new bot with the given token and operator chat.
    pub fn new(token: &str, chat_id: ChatId, rules: RulesStore, feed: FeedConfig) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id,
            rules,
            feed,
        }
    }

    /// Build from `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID`. `None` when
    /// either is absent or malformed.
    pub fn from_env(rules: RulesStore, feed: FeedConfig) -> Option<Self> {
        let token = std::env::var("TELEGRAM_TOKEN").ok()?;
        if token.trim().is_empty() {
            return None;
        }
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()?;
        Some(Self::new(&token, ChatId(chat_id), rules, feed))
    }

    /// Send an HTML message to the operator chat.
    pub async fn send_html(&self, text: &str) -> Result<(), TelegramError> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    /// Run the bot command handler until interrupted.
    pub async fn run(self: Arc<Self>) {
        let bot = self.bot.clone();
        let handler = Update::filter_message().filter_command::<Command>().endpoint(
            move |bot: Bot, msg: Message, cmd: Command| {
                let this = Arc::clone(&self);
                async move { this.handle_command(bot, msg, cmd).await }
            },
        );

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_command(
        &self,
        bot: Bot,
        msg: Message,
        cmd: Command,
    ) -> Result<(), TelegramError> {
        // Single-operator bot: anyone else's chat is silently ignored.
        if msg.chat.id != self.chat_id {
            debug!(chat_id = msg.chat.id.0, "Ignoring command from unknown chat");
            return Ok(());
        }

        let text = match cmd {
            Command::Help => HELP_TEXT.to_string(),
            Command::Thresholds => self.thresholds_reply()?,
            Command::Set(args) => self.set_reply(&args)?,
            Command::Unset(args) => self.unset_reply(&args)?,
            Command::Calc(args) => self.calc_reply(&args).await?,
            Command::Fees => self.fees_reply()?,
            Command::Rules => self.rules_reply()?,
        };

        bot.send_message(msg.chat.id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    fn thresholds_reply(&self) -> Result<String, TelegramError> {
        let rules = self.rules.load()?;

        let show_rule_headers = rules.capital_rules.len() > 1;
        let mut lines = Vec::new();
        for (index, rule) in rules.capital_rules.iter().enumerate() {
            if rule.thresholds.is_empty() {
                continue;
            }
            if show_rule_headers {
                lines.push(format!("Regla {}:", index + 1));
            }
            for (day, value) in &rule.thresholds {
                lines.push(format!("• {} días → {:.2}%", day, value));
            }
        }

        if lines.is_empty() {
            return Ok(
                "No hay umbrales cargados aún. Usá: /set &lt;dias&gt; &lt;umbral&gt;".to_string(),
            );
        }
        Ok(format!("<b>Umbrales cargados</b>\n{}", lines.join("\n")))
    }

    fn set_reply(&self, args: &str) -> Result<String, TelegramError> {
        const USAGE: &str = "Uso: /set [regla] &lt;dias&gt; &lt;umbral&gt;\nEj: /set 7 55";

        let parts: Vec<&str> = args.split_whitespace().collect();
        let (rule_number, day_raw, value_raw) = match parts.as_slice() {
            [day, value] => (1, *day, *value),
            [rule, day, value] => match rule.parse::<usize>() {
                Ok(n) if n >= 1 => (n, *day, *value),
                _ => return Ok(USAGE.to_string()),
            },
            _ => return Ok(USAGE.to_string()),
        };
        let Ok(day) = day_raw.parse::<u32>() else {
            return Ok(USAGE.to_string());
        };
        let Ok(value) = value_raw.parse::<f64>() else {
            return Ok(USAGE.to_string());
        };

        let mut rules = self.rules.load()?;
        if day < rules.day_min || day > rules.day_max {
            return Ok(format!(
                "El día debe estar entre {} y {}.",
                rules.day_min, rules.day_max
            ));
        }
        let Some(rule) = rules.capital_rules.get_mut(rule_number - 1) else {
            return Ok(format!("No existe la regla {}.", rule_number));
        };
        rule.thresholds.insert(day, value);
        self.rules.save(&rules)?;
        Ok(format!("✅ Umbral seteado: {} días → {:.2}%", day, value))
    }

    fn unset_reply(&self, args: &str) -> Result<String, TelegramError> {
        const USAGE: &str = "Uso: /unset [regla] &lt;dias&gt;\nEj: /unset 7";

        let parts: Vec<&str> = args.split_whitespace().collect();
        let (rule_number, day_raw) = match parts.as_slice() {
            [day] => (1, *day),
            [rule, day] => match rule.parse::<usize>() {
                Ok(n) if n >= 1 => (n, *day),
                _ => return Ok(USAGE.to_string()),
            },
            _ => return Ok(USAGE.to_string()),
        };
        let Ok(day) = day_raw.parse::<u32>() else {
            return Ok(USAGE.to_string());
        };

        let mut rules = self.rules.load()?;
        let Some(rule) = rules.capital_rules.get_mut(rule_number - 1) else {
            return Ok(format!("No existe la regla {}.", rule_number));
        };
        if rule.thresholds.remove(&day).is_some() {
            self.rules.save(&rules)?;
            Ok(format!("✅ Umbral eliminado para {} días.", day))
        } else {
            Ok(format!("No había umbral para {} días.", day))
        }
    }

    async fn calc_reply(&self, args: &str) -> Result<String, TelegramError> {
        const USAGE: &str = "Uso: /calc &lt;monto&gt; &lt;dias&gt; [tasa]\n\
                             Ej: /calc 3000000 7\n\
                             Ej: /calc 3000000 7 60";

        let parts: Vec<&str> = args.split_whitespace().collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Ok(USAGE.to_string());
        }
        let Some(amount) = parse_amount(parts[0]) else {
            return Ok(USAGE.to_string());
        };
        let Ok(days) = parts[1].parse::<u32>() else {
            return Ok(USAGE.to_string());
        };

        let rules = self.rules.load()?;
        let (rate, vto) = match parts.get(2) {
            // Explicit rate: no fetch, no maturity date to show.
            Some(raw) => match raw.parse::<f64>() {
                Ok(rate) => (rate, "?".to_string()),
                Err(_) => return Ok(USAGE.to_string()),
            },
            None => {
                let client = BymaClient::new(&self.feed)?;
                let rows = client.fetch_cauciones().await?;
                let quotes =
                    best_quotes_by_maturity(&rows, &rules.currency, rules.day_min, rules.day_max);
                match quotes.get(&days) {
                    Some(quote) => {
                        let vto = quote
                            .maturity_date
                            .as_deref()
                            .map(format_date)
                            .unwrap_or_else(|| "?".to_string());
                        (quote.rate, vto)
                    }
                    None => {
                        return Ok(format!(
                            "No encontré tasa {} para {} días ahora mismo.",
                            rules.currency, days
                        ))
                    }
                }
            }
        };

        let cost = rules.cost_model();
        let breakdown = simulate_placement(amount, days, rate, &cost);
        let cost_label = if rules.fees.market_fee_rate > 0.0 {
            "broker+IVA+mercado"
        } else {
            "broker+IVA"
        };
        Ok(format!(
            "📌 <b>Cálculo caución {} 🚨</b>\n\
             Monto: {}\n\
             Plazo: {} días\n\
             Vto: {}\n\
             Caución Colocadora (TNA aprox): {:.2}%\n\n\
             Interés bruto: {}\n\
             Costos ({}): {}\n\
             Interés neto estimado: {}\n\
             Total estimado al vencimiento: {}\n\
             📌 Base: {} días",
            rules.currency,
            format_money(amount),
            days,
            vto,
            rate,
            format_money(breakdown.gross_interest),
            cost_label,
            format_money(breakdown.total_cost),
            format_money(breakdown.net_interest),
            format_money(breakdown.net_total),
            cost.day_basis
        ))
    }

    fn fees_reply(&self) -> Result<String, TelegramError> {
        let rules = self.rules.load()?;
        let fees = &rules.fees;
        Ok(format!(
            "<b>Fees</b>\n\
             Broker: {:.4}%\n\
             IVA sobre broker: {:.2}%\n\
             Market fee: {:.4}%\n\
             Total sobre monto (aprox): {:.4}%",
            fees.broker_commission_rate * 100.0,
            fees.iva_rate * 100.0,
            fees.market_fee_rate * 100.0,
            rules.cost_model().cost_rate * 100.0,
        ))
    }

    fn rules_reply(&self) -> Result<String, TelegramError> {
        let rules = self.rules.load()?;
        if rules.capital_rules.is_empty() {
            return Ok("No hay reglas de capital cargadas.".to_string());
        }

        let mut out = String::from("<b>Reglas de capital</b>");
        for (index, rule) in rules.capital_rules.iter().enumerate() {
            let status = if rule.enabled { "" } else { " (desactivada)" };
            out.push_str(&format!(
                "\nRegla {}{}: {} – {} | días {}–{}",
                index + 1,
                status,
                format_money(rule.capital_min),
                format_money(rule.capital_max),
                rule.day_min,
                rule.day_max
            ));
            if rule.min_net_profit > 0.0 {
                out.push_str(&format!(" | objetivo {}", format_money(rule.min_net_profit)));
            }
            if !rule.thresholds.is_empty() {
                let entries: Vec<String> = rule
                    .thresholds
                    .iter()
                    .map(|(day, value)| format!("{}d → {:.2}%", day, value))
                    .collect();
                out.push_str(&format!("\n  Umbrales: {}", entries.join(", ")));
            }
        }
        Ok(out)
    }
}

/// Render a cycle report as one Telegram HTML message.
pub fn render_report(report: &Report, now: &DateTime<Utc>) -> String {
    let currency = report
        .sections
        .first()
        .map(|s| s.quote.currency.as_str())
        .unwrap_or("ARS");

    let mut out = format!("🚨 <b>CAUCIONES {}</b>", currency);

    for section in &report.sections {
        out.push_str(&format!("\n\n<b>Plazo: {} días</b>", section.days));
        if let Some(date) = &section.quote.maturity_date {
            out.push_str(&format!(" | Vto: {}", format_date(date)));
        }
        out.push_str(&format!("\nTasa: {:.2}%", section.quote.rate));

        for m in &section.matches {
            out.push_str(&format!(
                "\nRegla {}: {} – {} (umbral {:.2}%)",
                m.rule_index + 1,
                format_money(m.capital_min),
                format_money(m.capital_max),
                m.threshold
            ));
            out.push_str(&format!(
                "\n  Neto: {} – {}",
                format_money(m.net_at_floor),
                format_money(m.net_at_ceiling)
            ));
            if m.min_net_profit > 0.0 {
                if m.floor_meets_target {
                    out.push_str(&format!(
                        "\n  ✅ Objetivo {} cubierto desde el mínimo",
                        format_money(m.min_net_profit)
                    ));
                } else if let Some(capital) = m.required_capital {
                    out.push_str(&format!(
                        "\n  ⚠️ Objetivo {} desde {}",
                        format_money(m.min_net_profit),
                        format_money(capital)
                    ));
                }
            }
        }
    }

    if let Some(best) = &report.best {
        out.push_str(&format!(
            "\n\n⭐ Mejor: {} días @ {:.2}% → {} netos (tope {})",
            best.days,
            best.rate,
            format_money(best.net_at_ceiling),
            format_money(best.capital_max)
        ));
    }

    out.push_str(&format!("\n\n⏰ {}", now.format("%Y-%m-%d %H:%M:%S UTC")));
    out
}
