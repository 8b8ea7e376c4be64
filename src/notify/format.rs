//! Telegram Markdown bodies for a finished run.

use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

use crate::model::Post;
use crate::text::truncate_chars;

pub const MAX_POSTS_SHOWN: usize = 8;
pub const MAX_POSTS_PER_FEED: usize = 2;
pub const MAX_TITLE_CHARS: usize = 80;

fn stamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%H:%M - %d/%m/%Y").to_string()
}

fn short_title(title: &str) -> String {
    let cut = truncate_chars(title, MAX_TITLE_CHARS);
    if cut.len() < title.len() {
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

/// Feeds in first-seen order, each with its posts in run order.
fn group_by_feed(posts: &[Post]) -> Vec<(&str, Vec<&Post>)> {
    let mut groups: Vec<(&str, Vec<&Post>)> = Vec::new();
    for p in posts {
        match groups.iter_mut().find(|(f, _)| *f == p.feed_name) {
            Some((_, v)) => v.push(p),
            None => groups.push((&p.feed_name, vec![p])),
        }
    }
    groups
}

fn deal_line(post: &Post) -> Option<String> {
    let a = post.price_analysis.as_ref()?;
    let promo = a.promo_price_brl?;
    let mut line = format!("💰 R$ {promo:.0} vs mercado R$ {:.0}", a.market_price_brl);
    if let (Some(pct), Some(q)) = (a.discount_percentage, a.deal_quality) {
        let _ = write!(line, " ({pct:.1}%, {q})");
    }
    if let Some(m) = a.miles_alternative.as_ref().filter(|m| m.worth_using_miles) {
        let _ = write!(line, " · {} {} pts", m.best_program, m.estimated_miles);
    }
    Some(line)
}

/// Summary of the admitted posts; `None` when there is nothing to report.
pub fn format_summary<Tz: TimeZone>(posts: &[Post], now: &DateTime<Tz>) -> Option<String>
where
    Tz::Offset: Display,
{
    if posts.is_empty() {
        return None;
    }

    let mut msg = String::from("🔥 *NOVAS PROMOÇÕES ENCONTRADAS!*\n\n");
    let mut shown = 0usize;
    for (feed, feed_posts) in group_by_feed(posts) {
        if shown >= MAX_POSTS_SHOWN {
            break;
        }
        let _ = writeln!(msg, "📰 *{feed}*");
        for p in feed_posts.into_iter().take(MAX_POSTS_PER_FEED) {
            if shown >= MAX_POSTS_SHOWN {
                break;
            }
            let _ = writeln!(msg, "📝 [{}]({})", short_title(&p.title), p.link);
            if let Some(line) = deal_line(p) {
                let _ = writeln!(msg, "{line}");
            }
            shown += 1;
        }
        msg.push('\n');
    }

    let remaining = posts.len() - shown;
    if remaining > 0 {
        let _ = write!(msg, "... e mais {remaining} promoções!\n\n");
    }
    let _ = writeln!(msg, "📊 *Total:* {} novas promoções", posts.len());
    let _ = write!(msg, "⏰ *Detectado em:* {}", stamp(now));
    Some(msg)
}

/// Heartbeat sent when filtering found nothing worth reporting.
pub fn format_no_results<Tz: TimeZone>(analyzed: usize, rejected: usize, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!(
        "🔍 *MONITORAMENTO ATIVO*\n\n\
         📊 *Análise concluída:*\n\
         • {analyzed} posts analisados\n\
         • {rejected} posts rejeitados\n\
         • 0 promoções de passagens para Recife encontradas\n\n\
         🎯 Buscando apenas passagens para Recife/PE.\n\n\
         ⏰ Verificado em: {}",
        stamp(now)
    )
}
