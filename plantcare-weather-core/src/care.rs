//! Plant-care advice derived from current conditions.

use serde::Serialize;

use crate::model::{Sky, WeatherReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareAdvice {
    pub city: String,
    pub temperature: i64,
    pub humidity: u8,
    pub condition: String,
    pub recommendations: Vec<String>,
}

impl CareAdvice {
    pub fn for_report(report: &WeatherReport, plant_type: Option<&str>) -> Self {
        Self {
            city: report.city.clone(),
            temperature: report.temperature,
            humidity: report.humidity,
            condition: report.description.clone(),
            recommendations: recommendations(report, plant_type),
        }
    }
}

pub fn recommendations(report: &WeatherReport, plant_type: Option<&str>) -> Vec<String> {
    let mut out = Vec::new();
    let sky = report.sky;

    if report.temperature < 10 {
        out.push(
            "Temperatura baja: considera proteger tus plantas del frío o moverlas a un lugar más cálido.",
        );
    } else if report.temperature > 30 {
        out.push("Temperatura alta: asegúrate de que tus plantas tengan suficiente agua y sombra.");
    }

    if report.humidity < 30 {
        out.push(
            "Humedad baja: considera rociar las hojas o usar un humidificador para tus plantas tropicales.",
        );
    } else if report.humidity > 80 {
        out.push("Humedad alta: ten cuidado con el exceso de riego y asegura buena ventilación.");
    }

    match sky {
        Sky::Rain => {
            out.push("Lluvia: reduce el riego manual y verifica que el drenaje sea adecuado.")
        }
        Sky::Clear => out.push(
            "Día soleado: perfecto para plantas que necesitan mucha luz, pero vigila la deshidratación.",
        ),
        Sky::Clouds => {
            out.push("Día nublado: buen momento para regar plantas que prefieren luz indirecta.")
        }
        Sky::Other => {}
    }

    if let Some(kind) = plant_type.map(str::to_lowercase) {
        if kind.contains("suculenta") || kind.contains("cactus") {
            if sky == Sky::Rain {
                out.push("Plantas suculentas: evita el riego adicional durante la lluvia.");
            }
        } else if (kind.contains("orquídea") || kind.contains("orquidea")) && report.humidity < 50 {
            out.push(
                "Orquídeas: necesitan más humedad. Considera rociar o usar una bandeja con agua.",
            );
        }
    }

    out.into_iter().map(str::to_string).collect()
}
