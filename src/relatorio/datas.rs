//! Formatação de datas em português para capas e nomes de arquivo.

use chrono::{Datelike, NaiveDate};

const MESES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Nome do mês por extenso (1 = Janeiro).
pub fn mes_por_extenso(mes: u32) -> &'static str {
    MESES[((mes.max(1) - 1) as usize).min(MESES.len() - 1)]
}

/// Data curta no formato brasileiro, "15/01/2024".
pub fn formatar_data_br(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

/// Mês e ano por extenso, "Janeiro de 2024".
pub fn mes_ano_por_extenso(data: NaiveDate) -> String {
    format!("{} de {}", mes_por_extenso(data.month()), data.year())
}

/// Linha de data da capa, "São Paulo, Janeiro de 2024".
pub fn formatar_data_capa(data: NaiveDate) -> String {
    format!("São Paulo, {}", mes_ano_por_extenso(data))
}
