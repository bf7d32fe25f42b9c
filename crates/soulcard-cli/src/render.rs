//! Terminal rendering of the cards

use colored::{ColoredString, Colorize};
use soulcard::{
    BirthChart, Card, DailyFortune, Diagnosis, FortuneCard, PersonalityCard, PersonalityStats,
    Rarity,
};

/// Parse `#RGB` or `#RRGGBB`
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 => Some((
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Text tinted with a hex color, plain when the color does not parse
fn tint(text: &str, hex: &str) -> ColoredString {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Ten-cell bar for a 0..=100 value
pub fn bar(value: u8) -> String {
    let filled = (usize::from(value.min(100)) + 5) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub fn stars(count: u8) -> String {
    let count = usize::from(count.min(5));
    format!("{}{}", "★".repeat(count), "☆".repeat(5 - count))
}

fn tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bullets(items: &[String]) {
    for item in items {
        println!("  • {}", item);
    }
}

pub fn card(card: &Card) {
    println!("{}", tint("━━━━━━━━━━━━━━━━━━━━━━━━", &card.border_color));
    println!("{}", card.title.bold());
    println!("{}", card.summary);
    println!("{}", tags(&card.tags).dimmed());
    println!(
        "{}",
        tint(&format!("{} {}", card.color_theme, card.border_color), &card.border_color)
    );
}

pub fn diagnosis(d: &Diagnosis) {
    println!(
        "{} {}",
        tint(&format!("[{}]", d.emotion_type), &d.emotion_color).bold(),
        d.title.bold()
    );
    println!("强度 {} {}", bar(d.intensity), d.intensity);
    println!("{}", d.analysis);
    println!("{}", tags(&d.tags).dimmed());
    println!("{}", "建议:".bold());
    bullets(&d.suggestions);
}

pub fn fortune_card(f: &FortuneCard) {
    println!("{} {}", f.date.dimmed(), tint(&f.title, &f.emotion_color).bold());
    println!("  总体: {}", f.fortune.overall);
    println!("  爱情: {}", f.fortune.love);
    println!("  事业: {}", f.fortune.career);
    println!("  健康: {}", f.fortune.health);
}

fn rarity(r: Rarity) -> ColoredString {
    let label = format!("[{}]", r);
    match r {
        Rarity::N => label.white(),
        Rarity::R => label.blue(),
        Rarity::SR => label.magenta(),
        Rarity::SSR => label.yellow().bold(),
        Rarity::UR => label.red().bold(),
    }
}

fn stat_rows(stats: &PersonalityStats) -> [(&'static str, u8); 6] {
    [
        ("内向", stats.introversion),
        ("创造", stats.creativity),
        ("幽默", stats.humor),
        ("逻辑", stats.logic),
        ("共情", stats.empathy),
        ("能量", stats.energy),
    ]
}

pub fn personality(p: &PersonalityCard) {
    println!(
        "{} {}",
        rarity(p.rarity),
        tint(&p.title, &p.visual.primary_color).bold()
    );
    println!("{}", p.analysis.comment);
    for (label, value) in stat_rows(&p.stats) {
        println!("  {} {} {:>3}", label, tint(&bar(value), &p.visual.primary_color), value);
    }
    println!("爱好: {}", p.analysis.hobbies.join("、"));
    println!("适配: {}", p.analysis.compatible);
}

pub fn daily_fortune(f: &DailyFortune) {
    let who = f.name.as_deref().unwrap_or("");
    println!(
        "{} {} {} {}",
        f.date.dimmed(),
        who.bold(),
        f.zodiac_icon,
        f.zodiac
    );
    if let Some(bazi) = &f.bazi {
        println!("八字 {}", bazi.dimmed());
    }
    println!(
        "综合 {}",
        tint(&format!("{} {}", bar(f.overall_score), f.overall_score), &f.theme_color).bold()
    );
    println!("  爱情 {}  {}", stars(f.love_stars), f.love_fortune);
    println!("  事业 {}  {}", stars(f.career_stars), f.career_fortune);
    println!("  财运 {}  {}", stars(f.wealth_stars), f.wealth_fortune);
    println!("{}", tags(&f.keywords).dimmed());
    println!(
        "幸运物 {}  幸运色 {}",
        f.lucky_item,
        tint(&f.lucky_color, &f.lucky_color_hex)
    );
    println!("{} {}", "宜".green().bold(), f.should_do.join("  "));
    println!("{} {}", "忌".red().bold(), f.should_not_do.join("  "));
    println!("{}", f.zodiac_fortune);
    println!("{}", f.zodiac_animal_fortune);
}

pub fn birth_chart(chart: &BirthChart) {
    println!("{}", "Birth chart:".bold());
    println!("  出生日期: {}", chart.birth_date);
    println!("  时辰: {}时 ({})", chart.birth_time, chart.hour_range);
    println!(
        "  星座: {} {} ({})",
        chart.zodiac_icon, chart.zodiac, chart.zodiac_english
    );
    println!("  生肖: {}", chart.zodiac_animal);
    println!("  八字: {}", chart.bazi.cyan().bold());
    for (label, pillar) in ["年柱", "月柱", "日柱", "时柱"].iter().zip(&chart.pillars) {
        println!("    {} {}", label.dimmed(), pillar);
    }
}
