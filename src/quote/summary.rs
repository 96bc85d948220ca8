use serde::Serialize;

/// Resolved form values for the clipboard export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub platform: String,
    pub nickname: String,
    pub rig_option: String,
    /// Checked add-ons and `label × qty` unit lines, in form order.
    pub add_ons: Vec<String>,
    pub expression: String,
    pub collab_artist: String,
    pub illustrator_info: Vec<String>,
    pub portfolio_privacy: String,
    pub extra: String,
}

impl OrderSummary {
    /// Newline-delimited request text. Every label line is always present;
    /// empty values leave nothing after the label.
    pub fn to_copy_text(&self) -> String {
        [
            "💌 리깅 신청 양식".to_string(),
            format!("방송 플랫폼: {}", self.platform),
            format!("방송 닉네임: {}", self.nickname),
            format!("리깅 옵션: {}", self.rig_option),
            format!("추가 옵션: {}", self.add_ons.join(", ")),
            format!("표정: {}", self.expression),
            format!(
                "일러스트레이터 정보: [{}] {}",
                self.collab_artist,
                self.illustrator_info.join(" / ")
            ),
            format!("포트폴리오 공개: {}", self.portfolio_privacy),
            format!("추가 문의사항: {}", self.extra),
        ]
        .join("\n")
    }
}
