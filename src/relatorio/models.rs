use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tipos de relatório aceitos pelo endpoint de geração.
///
/// `registro` e `unified` ainda não possuem layout próprio e são
/// atendidos pelo gerador de evidências, como na rota original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipoRelatorio {
    Mutirao,
    Registro,
    Evidencias,
    Unified,
    Rotineiros,
    Monumentos,
}

impl TipoRelatorio {
    /// Nome do tipo na forma usada em nomes de arquivo e logs.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Mutirao => "mutirao",
            Self::Registro => "registro",
            Self::Evidencias => "evidencias",
            Self::Unified => "unified",
            Self::Rotineiros => "rotineiros",
            Self::Monumentos => "monumentos",
        }
    }
}

/// Corpo do `POST /api/generate-pdf`.
///
/// `dados` é desserializado para o tipo concreto de relatório depois do
/// roteamento por `tipo`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePdfRequest {
    pub tipo: TipoRelatorio,
    #[schema(value_type = Object)]
    pub dados: serde_json::Value,
    #[serde(default)]
    pub consolidated: bool,
}

/// Foto anexada a um relatório.
///
/// `url` aceita endereços http(s) ou data-URIs base64. `ordem` é a
/// posição de upload; fotos sem ordem contam como 0 e a ordenação é
/// estável.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Foto {
    #[schema(example = "data:image/jpeg;base64,/9j/4AAQ...")]
    pub url: String,
    #[serde(default)]
    #[schema(example = "Antes da limpeza")]
    pub descricao: Option<String>,
    #[serde(default)]
    pub ordem: Option<u32>,
}

/// Linha da tabela de quantitativo do mutirão.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuantitativoItem {
    #[schema(example = "Entulho removido")]
    pub descricao: String,
    #[serde(default)]
    pub quantidade: Option<f64>,
    #[serde(default)]
    #[schema(example = "ton")]
    pub unidade: Option<String>,
}

/// Serviço executado dentro de uma seção de mutirão.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Servico {
    #[schema(example = "Capinação e raspagem")]
    pub assunto: String,
    #[serde(default)]
    pub fotos: Vec<Foto>,
}

/// Seção de mutirão: uma sub-região com seus serviços.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Secao {
    #[schema(example = "ST")]
    pub sub: String,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub servicos: Vec<Servico>,
}

/// Relatório de mutirão (campanha de limpeza agendada).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutiraoRelatorio {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    pub secoes: Vec<Secao>,
    #[serde(default)]
    pub quantitativo: Vec<QuantitativoItem>,
}

/// Relatório de evidências fotográficas de um serviço.
///
/// Mesmo formato atende `registro` e `unified`. O período pode vir como
/// `data` única ou como intervalo `dataInicio`/`dataFim`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenciasRelatorio {
    #[serde(default)]
    #[schema(example = "ZELADORIA")]
    pub tipo_servico: String,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    #[serde(default)]
    #[schema(example = "ST")]
    pub sub: Option<String>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub fotos: Vec<Foto>,
}

impl EvidenciasRelatorio {
    /// Data de referência do relatório: `data` ou, na falta, `dataInicio`.
    pub fn data_referencia(&self) -> Option<NaiveDate> {
        self.data.or(self.data_inicio)
    }

    /// Período formatado para o bloco descritor ("15/01/2024" ou
    /// "01/02/2024 a 15/02/2024").
    pub fn periodo_formatado(&self) -> String {
        use super::datas::formatar_data_br;

        if let Some(data) = self.data {
            return formatar_data_br(data);
        }
        match (self.data_inicio, self.data_fim) {
            (Some(inicio), Some(fim)) => {
                format!("{} a {}", formatar_data_br(inicio), formatar_data_br(fim))
            }
            (Some(inicio), None) => formatar_data_br(inicio),
            _ => String::new(),
        }
    }
}

/// Relatório mensal de serviços rotineiros.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotineirosRelatorio {
    #[serde(default)]
    pub tipo_servico: Option<String>,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub servicos: Vec<Servico>,
}

/// Relatório de intervenção em monumento.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonumentosRelatorio {
    #[serde(default)]
    #[schema(example = "MONUMENTOS")]
    pub tipo_servico: String,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    #[schema(example = "SP")]
    pub sub: Option<String>,
    #[serde(default)]
    #[schema(example = "Obelisco do Ibirapuera")]
    pub monumento: Option<String>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub fotos: Vec<Foto>,
}

/// Nome de exibição de uma sub-região; códigos desconhecidos passam
/// adiante sem tradução.
pub fn nome_sub_regiao(codigo: &str) -> &str {
    match codigo {
        "CV" => "Casa Verde / Cachoeirinha",
        "JT" => "Jaçanã / Tremembé",
        "MG" => "Vila Maria / Vila Guilherme",
        "ST" => "Santana / Tucuruvi",
        "SP" => "Sé / República",
        outro => outro,
    }
}

/// Nome de exibição de um tipo de serviço.
pub fn nome_servico(codigo: &str) -> &str {
    match codigo {
        "ZELADORIA" => "Zeladoria Urbana",
        "ACUMULADOR" => "Ação com Acumulador",
        "ALAGAMENTOS" => "Pontos de Alagamento",
        "DESFAZIMENTO" => "Desfazimento de Ocupação",
        "MONUMENTOS" => "Conservação de Monumentos",
        "REVITALIZACAO" => "Revitalização de Espaço Público",
        outro => outro,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_relatorio_wire_form() {
        let tipo: TipoRelatorio = serde_json::from_str(r#""mutirao""#).unwrap();
        assert_eq!(tipo, TipoRelatorio::Mutirao);
        assert_eq!(tipo.slug(), "mutirao");
    }

    #[test]
    fn test_evidencias_deserialization_camel_case() {
        let json = r#"{
            "tipoServico": "ZELADORIA",
            "dataInicio": "2024-02-01",
            "dataFim": "2024-02-15",
            "sub": "ST",
            "local": "Praça Heróis da FEB",
            "fotos": [
                { "url": "https://example.com/a.jpg", "descricao": "Antes", "ordem": 2 },
                { "url": "https://example.com/b.jpg", "ordem": 1 }
            ]
        }"#;

        let rel: EvidenciasRelatorio = serde_json::from_str(json).unwrap();
        assert_eq!(rel.tipo_servico, "ZELADORIA");
        assert!(rel.data.is_none());
        assert_eq!(rel.data_referencia().unwrap().to_string(), "2024-02-01");
        assert_eq!(rel.periodo_formatado(), "01/02/2024 a 15/02/2024");
        assert_eq!(rel.fotos.len(), 2);
        assert_eq!(rel.fotos[0].descricao.as_deref(), Some("Antes"));
    }

    #[test]
    fn test_evidencias_data_unica_tem_precedencia() {
        let json = r#"{ "tipoServico": "X", "data": "2024-01-15", "dataInicio": "2024-01-01" }"#;
        let rel: EvidenciasRelatorio = serde_json::from_str(json).unwrap();
        assert_eq!(rel.periodo_formatado(), "15/01/2024");
    }

    #[test]
    fn test_data_malformada_falha_na_desserializacao() {
        let json = r#"{ "tipoServico": "X", "data": "15-01-2024" }"#;
        let resultado = serde_json::from_str::<EvidenciasRelatorio>(json);
        assert!(resultado.is_err());
    }

    #[test]
    fn test_nome_sub_regiao_passa_desconhecidos() {
        assert_eq!(nome_sub_regiao("ST"), "Santana / Tucuruvi");
        assert_eq!(nome_sub_regiao("XYZ"), "XYZ");
    }
}
