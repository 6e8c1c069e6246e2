use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One raw sheet row, column names as published by the upstream
/// spreadsheet. Every field except the name may be absent or blank.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SheetRow {
    #[serde(rename = "병원명", default, deserialize_with = "blank_as_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "진료과목", default, deserialize_with = "blank_as_none")]
    pub(crate) department: Option<String>,
    #[serde(rename = "병원구분", default, deserialize_with = "blank_as_none")]
    pub(crate) level: Option<String>,
    #[serde(rename = "주소", default, deserialize_with = "blank_as_none")]
    pub(crate) address: Option<String>,
    #[serde(rename = "전화번호", default, deserialize_with = "blank_as_none")]
    pub(crate) phone: Option<String>,
    #[serde(rename = "홈페이지주소", default, deserialize_with = "blank_as_none")]
    pub(crate) homepage: Option<String>,
    #[serde(rename = "위도", default, deserialize_with = "blank_as_none")]
    pub(crate) lat: Option<String>,
    #[serde(rename = "경도", default, deserialize_with = "blank_as_none")]
    pub(crate) lng: Option<String>,
    #[serde(rename = "영업시간", default, deserialize_with = "blank_as_none")]
    pub(crate) availability: Option<String>,
    #[serde(rename = "주차가능", default, deserialize_with = "blank_as_none")]
    pub(crate) parking: Option<String>,
    #[serde(rename = "여의사진료여부", default, deserialize_with = "blank_as_none")]
    pub(crate) female_physician: Option<String>,
    #[serde(rename = "맘모톰(VABE)", default, deserialize_with = "blank_as_none")]
    pub(crate) mammotome: Option<String>,
    #[serde(rename = "갑상선고주파열치료", default, deserialize_with = "blank_as_none")]
    pub(crate) thyroid_rfa: Option<String>,
    #[serde(rename = "유방조직검사", default, deserialize_with = "blank_as_none")]
    pub(crate) breast_biopsy: Option<String>,
    #[serde(rename = "갑상선조직검사", default, deserialize_with = "blank_as_none")]
    pub(crate) thyroid_biopsy: Option<String>,
    #[serde(rename = "유방초음파가격", default, deserialize_with = "blank_as_none")]
    pub(crate) breast_ultrasound_price: Option<String>,
    #[serde(rename = "갑상선초음파가격", default, deserialize_with = "blank_as_none")]
    pub(crate) thyroid_ultrasound_price: Option<String>,
    #[serde(rename = "회송이력", default, deserialize_with = "blank_as_none")]
    pub(crate) referral_count: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<SheetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<SheetRow>() {
        rows.push(row?);
    }

    Ok(rows)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
