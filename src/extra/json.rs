//! JSON export of finished graphs.

use serde_json::Value;

use crate::graph::SynthGraph;

impl SynthGraph {
    /// The node list as a JSON value.
    ///
    /// ```
    /// # use ugengraph::{config::GraphConfig, graph::SynthGraph, extra::builtin::SinOsc};
    /// let graph = SynthGraph::build(GraphConfig::default(), &[SinOsc::kr().into()]).unwrap();
    /// let json = graph.to_json_value().unwrap();
    /// assert_eq!(json["nodes"][0]["name"], "SinOsc");
    /// assert_eq!(json["nodes"][0]["rate"], "control");
    /// ```
    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// The node list as JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The node list as indented JSON text.
    ///
    /// ```
    /// # use ugengraph::{config::GraphConfig, graph::SynthGraph, extra::builtin::WhiteNoise};
    /// let graph = SynthGraph::build(GraphConfig::default(), &[WhiteNoise::ar().into()]).unwrap();
    /// let text = graph.to_json_pretty().unwrap();
    /// assert!(text.contains('\n'));
    /// assert!(text.contains(r#""name": "WhiteNoise""#));
    /// ```
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        config::GraphConfig,
        extra::builtin::{Out, SinOsc},
        graph::{SynthGraph, GE},
    };

    #[test]
    fn inputs_are_tagged() {
        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[Out::kr().bus(3).input(SinOsc::kr()).into()],
        )
        .unwrap();
        let json = graph.to_json_value().unwrap();
        assert_eq!(
            json["nodes"][1]["inputs"],
            json!([
                {"constant": 3.0},
                {"output": {"node": 0, "index": 0, "rate": "control"}}
            ])
        );
        assert_eq!(json["nodes"][1]["outputs"], json!([]));
        assert_eq!(json["nodes"][1]["flags"]["side_effect"], true);
    }

    #[test]
    fn operators_carry_special_index() {
        let ge = GE::from(SinOsc::kr()) - 1;
        let graph = SynthGraph::build(GraphConfig::default(), &[ge]).unwrap();
        let text = graph.to_json().unwrap();
        assert!(text.contains(r#""name":"BinaryOpUGen","rate":"control","special_index":1"#));
    }
}
