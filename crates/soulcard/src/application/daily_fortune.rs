//! Daily fortune: local calendar math plus a model-authored narrative

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{FeatureRunner, JSON_ONLY};
use crate::domain::entities::{DailyFortune, FortuneSubject};
use crate::domain::errors::{Feature, FeatureError, PipelineError};
use crate::domain::services::{format_chinese_date, BirthChart, FortuneBaseline};
use crate::domain::value_objects::{EarthlyBranch, FortuneTier};
use crate::ports::services::CompletionProvider;

pub const DAILY_FORTUNE_TEMPERATURE: f32 = 0.8;

const SYSTEM_PROMPT: &str = r#"你是一位专业的占星师和生辰八字专家，拥有深厚的传统命理学和现代占星学知识。你的职责是根据用户提供的生辰八字、星座、生肖等信息，结合当前日期，进行专业的运势分析和评分。

重要原则：
1. 根据专业分析计算分数和星级：像真正的命理师一样，基于生辰八字、星座、生肖、当前日期等综合因素，客观评估运势，给出0-100分的综合运势分数，以及爱情、事业、财运的1-5星评级。
2. 合理分配分数，不要过度保守：
   - 如果分析结果一般或普通，应该给 55-75 分（这是最常见的情况）
   - 如果各方面都比较顺，应该给 65-85 分和 4 星
   - 如果各方面都很有利，应该给 75-90 分和 4-5 星
   - 只有当明确分析出不利因素时，才给 30-55 分和 2-3 星
   - 分数要多样化，不要总是集中在低分段
3. 结合专业分析：分析八字中天干地支的相生相克关系、星座在当前时间段的影响、生肖与当前年份的关系、出生时辰对运势的影响。
4. 风格要现代、年轻、有网感，但必须建立在专业和真实的基础上。

大部分人的日常运势应该是中等偏上的（60-75分）。"#;

/// Inputs of one daily fortune request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFortuneRequest {
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: EarthlyBranch,
    /// Defaults to today's local date
    pub target_date: Option<NaiveDate>,
}

fn theme_color_table() -> String {
    [
        (FortuneTier::Excellent, ">=80分"),
        (FortuneTier::Good, "60-79分"),
        (FortuneTier::Fair, "40-59分"),
        (FortuneTier::Poor, "<40分"),
    ]
    .iter()
    .map(|(tier, band)| format!("{}（{}，{}）", tier.theme_color(), band, tier.color_name()))
    .collect::<Vec<_>>()
    .join("、")
}

fn user_prompt(
    subject: &FortuneSubject,
    birth_date: NaiveDate,
    chart: &BirthChart,
    baseline: &FortuneBaseline,
) -> String {
    let birth_date = birth_date.format("%Y/%-m/%-d");
    let themes = theme_color_table();
    format!(
        r##"请根据以下信息生成今日运势（必须是有效的 JSON，不要包含任何其他文字）：

用户信息：
- 姓名：{name}
- 出生日期：{birth_date}
- 出生时辰：{branch}时（{hours}）
- 生辰八字：{bazi}
- 星座：{zodiac}
- 生肖：{animal}
- 今日日期：{date}

参考基线（由出生信息和日期推算，仅供校准，请结合专业分析自行判断）：
- 综合运势：{score} 分
- 爱情：{love} 星，事业：{career} 星，财运：{wealth} 星

请按照以下 JSON 格式输出：

{{
  "date": "{date}",
  "zodiac": "{zodiac}",
  "zodiacIcon": "{icon}",
  "overallScore": 0-100 的整数（一般情况给55-75分，较好给65-85分，很好给75-90分，只有明确不利时才给30-55分）,
  "loveStars": 1-5 的整数,
  "careerStars": 1-5 的整数,
  "wealthStars": 1-5 的整数,
  "keywords": ["关键词1", "关键词2", "关键词3"],
  "luckyItem": "幸运物（如：冰美式、蓝牙耳机）",
  "luckyColor": "幸运色名称（如：克莱因蓝、樱花粉）",
  "luckyColorHex": "#颜色值",
  "shouldDo": ["宜事项1", "宜事项2", "宜事项3"],
  "shouldNotDo": ["忌事项1", "忌事项2", "忌事项3"],
  "zodiacFortune": "星座运势分析（50-100字）",
  "zodiacAnimalFortune": "属相运势分析（50-100字）",
  "loveFortune": "爱情运势分析（50-100字，与爱情星级一致）",
  "careerFortune": "事业运势分析（50-100字，与事业星级一致）",
  "wealthFortune": "财运分析（50-100字，与财运星级一致）",
  "themeColor": "根据整体运势分数选择：{themes}",
  "birthTime": "{branch}",
  "bazi": "{bazi}"
}}

要求：
1. 关键词要有网感，如"断舍离"、"桃花朵朵"、"搞钱"、"水逆"，但要符合实际情况
2. 幸运物和幸运色要现代、年轻化
3. 宜忌事项要实用、有趣，必须符合运势的实际情况
4. keywords、shouldDo、shouldNotDo 各 1-3 项

{JSON_ONLY}"##,
        name = subject.name,
        branch = subject.birth_time.as_char(),
        hours = subject.birth_time.hour_range(),
        bazi = subject.bazi,
        zodiac = subject.zodiac,
        icon = subject.zodiac_icon,
        animal = chart.zodiac_animal,
        date = subject.date,
        score = baseline.score,
        love = baseline.love_stars,
        career = baseline.career_stars,
        wealth = baseline.wealth_stars,
    )
}

/// Builds the daily report: computes the chart locally, lets the model
/// write the narrative, then stamps the local identity fields back on.
pub struct DailyFortuneService<P: CompletionProvider + ?Sized> {
    runner: FeatureRunner<P>,
}

impl<P: CompletionProvider + ?Sized> DailyFortuneService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            runner: FeatureRunner::new(provider),
        }
    }

    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            runner: self.runner.cancel_on(token),
        }
    }

    pub async fn generate(&self, request: DailyFortuneRequest) -> Result<DailyFortune, FeatureError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(self.runner.fail(
                Feature::DailyFortune,
                PipelineError::InvalidInput("请输入姓名。".to_string()),
            ));
        }

        let target = request
            .target_date
            .unwrap_or_else(|| Local::now().date_naive());
        let chart = BirthChart::compute(request.birth_date, request.birth_time);
        let baseline = FortuneBaseline::compute(name, request.birth_date, target);
        let subject = FortuneSubject {
            name: name.to_string(),
            birth_time: request.birth_time,
            bazi: chart.bazi.clone(),
            date: format_chinese_date(target),
            zodiac: chart.zodiac.clone(),
            zodiac_icon: chart.zodiac_icon.clone(),
        };

        info!(
            zodiac = %chart.zodiac,
            animal = %chart.zodiac_animal,
            bazi = %chart.bazi,
            date = %subject.date,
            baseline = baseline.score,
            "Generating daily fortune"
        );

        let report: DailyFortune = self
            .runner
            .structured(
                Feature::DailyFortune,
                SYSTEM_PROMPT,
                &user_prompt(&subject, request.birth_date, &chart, &baseline),
                DAILY_FORTUNE_TEMPERATURE,
            )
            .await?;

        let report = report.finalize(&subject);
        info!(
            score = report.overall_score,
            tier = ?report.tier(),
            "Daily fortune generated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedProvider;
    use crate::domain::errors::ErrorKind;
    use crate::pipeline::schemas::samples;
    use serde_json::json;

    fn request() -> DailyFortuneRequest {
        DailyFortuneRequest {
            name: "张三".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            birth_time: EarthlyBranch::Zi,
            target_date: NaiveDate::from_ymd_opt(2025, 1, 15),
        }
    }

    #[tokio::test]
    async fn test_identity_fields_are_overridden() {
        let mut reply = samples::daily_fortune();
        reply["name"] = json!("李四");
        reply["birthTime"] = json!("午");
        reply["bazi"] = json!("甲子 甲子 甲子 甲子");
        reply["zodiac"] = json!("双鱼座");
        reply["overallScore"] = json!(85);
        reply["themeColor"] = json!("#ef4444");
        let provider = Arc::new(ScriptedProvider::new().reply(reply.to_string()));

        let report = DailyFortuneService::new(provider.clone())
            .generate(request())
            .await
            .unwrap();

        let expected_bazi = BirthChart::compute(request().birth_date, EarthlyBranch::Zi).bazi;
        assert_eq!(report.name.as_deref(), Some("张三"));
        assert_eq!(report.birth_time.as_deref(), Some("子"));
        assert_eq!(report.bazi.as_deref(), Some(expected_bazi.as_str()));
        assert_eq!(report.zodiac, "金牛座");
        assert_eq!(report.date, "2025年1月15日星期三");
        assert_eq!(report.theme_color, "#10b981");
        assert_eq!(report.love_fortune, "桃花微开");
    }

    #[tokio::test]
    async fn test_prompt_carries_local_computations() {
        let provider =
            Arc::new(ScriptedProvider::new().reply(samples::daily_fortune().to_string()));
        DailyFortuneService::new(provider.clone())
            .generate(request())
            .await
            .unwrap();

        let call = &provider.calls()[0];
        assert_eq!(call.temperature, DAILY_FORTUNE_TEMPERATURE);
        assert!(call.system().contains("55-75"));
        let prompt = call.last();
        let baseline = FortuneBaseline::compute(
            "张三",
            request().birth_date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        assert!(prompt.contains("出生日期：1990/5/15"));
        assert!(prompt.contains("出生时辰：子时（23:00-01:00）"));
        assert!(prompt.contains("生肖：马"));
        assert!(prompt.contains(&format!("综合运势：{} 分", baseline.score)));
        assert!(prompt.contains("#10b981（>=80分，green）"));
        assert!(prompt.contains("#ef4444（<40分，red）"));
    }

    #[tokio::test]
    async fn test_blank_name_is_invalid_input() {
        let provider = Arc::new(ScriptedProvider::new());
        let err = DailyFortuneService::new(provider.clone())
            .generate(DailyFortuneRequest {
                name: "  ".to_string(),
                ..request()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_stars_rejected() {
        let mut reply = samples::daily_fortune();
        reply["careerStars"] = json!(7);
        let provider = Arc::new(ScriptedProvider::new().reply(reply.to_string()));
        let err = DailyFortuneService::new(provider)
            .generate(request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("careerStars"));
    }
}
