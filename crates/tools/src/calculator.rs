//! Calculator Tool
//!
//! Evaluates infix arithmetic (`+ - * / ^`, parentheses, unary minus).
//! Evaluation errors come back inside the payload so the backend can see
//! them as content and recover.

use std::collections::HashMap;

use agentmark_core::{
    error::{AgentError, Result},
    tool::{ParameterSchema, Tool, ToolSchema},
};
use async_trait::async_trait;

/// Tool evaluating mathematical expressions
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculate".into(),
            description: "Evaluate a mathematical expression".into(),
            parameters: vec![ParameterSchema::required(
                "expression",
                "string",
                "The expression to evaluate",
            )],
        }
    }

    async fn execute(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let expression = arguments
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::InvalidToolInput("expression must be a string".into()))?;

        match evaluate(expression) {
            Ok(value) => Ok(serde_json::json!({
                "expression": expression,
                "result": number_value(value),
                "error": null,
            })),
            Err(message) => Ok(serde_json::json!({
                "expression": expression,
                "result": null,
                "error": message,
            })),
        }
    }
}

/// Integer-valued results serialize without a fractional part
fn number_value(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serde_json::json!(value as i64)
    } else {
        serde_json::json!(value)
    }
}

/// Recursive infix evaluator, lowest-precedence operator split last
fn evaluate(expression: &str) -> std::result::Result<f64, String> {
    let expr: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if expr.is_empty() {
        return Err("empty expression".into());
    }
    evaluate_stripped(&expr)
}

fn evaluate_stripped(expr: &str) -> std::result::Result<f64, String> {
    // Innermost parenthesized group first
    if let Some(start) = expr.rfind('(') {
        let Some(end) = expr[start..].find(')') else {
            return Err("unbalanced parentheses".into());
        };
        let inner = evaluate_stripped(&expr[start + 1..start + end])?;
        let rewritten = format!("{}{}{}", &expr[..start], inner, &expr[start + end + 1..]);
        return evaluate_stripped(&rewritten);
    }
    if expr.contains(')') {
        return Err("unbalanced parentheses".into());
    }

    // Addition/subtraction, rightmost binary occurrence
    for (i, c) in expr.char_indices().rev() {
        if (c == '+' || c == '-') && i > 0 {
            let prev = expr.as_bytes()[i - 1] as char;
            // Skip unary signs and exponent notation ("1e-5")
            if prev.is_ascii_digit() || prev == ')' || prev == '.' {
                let left = evaluate_stripped(&expr[..i])?;
                let right = evaluate_stripped(&expr[i + 1..])?;
                return Ok(if c == '+' { left + right } else { left - right });
            }
        }
    }

    // Multiplication/division
    for (i, c) in expr.char_indices().rev() {
        if c == '*' || c == '/' {
            let left = evaluate_stripped(&expr[..i])?;
            let right = evaluate_stripped(&expr[i + 1..])?;
            if c == '/' && right == 0.0 {
                return Err("division by zero".into());
            }
            return Ok(if c == '*' { left * right } else { left / right });
        }
    }

    // Power
    if let Some(i) = expr.find('^') {
        let left = evaluate_stripped(&expr[..i])?;
        let right = evaluate_stripped(&expr[i + 1..])?;
        return Ok(left.powf(right));
    }

    expr.parse::<f64>()
        .map_err(|_| format!("not a number: '{expr}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluator() {
        assert!((evaluate("2 + 2").unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((evaluate("10 * 5").unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((evaluate("(2 + 3) * 4").unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((evaluate("2 ^ 8").unwrap() - 256.0).abs() < f64::EPSILON);
        assert!((evaluate("-3 + 5").unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((evaluate("345 * 892").unwrap() - 307_740.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evaluator_errors() {
        assert!(evaluate("10 / 0").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("two plus two").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[tokio::test]
    async fn test_payload_success_shape() {
        let mut arguments = HashMap::new();
        arguments.insert("expression".to_string(), serde_json::json!("345 * 892"));

        let payload = CalculatorTool.execute(&arguments).await.unwrap();
        assert_eq!(payload["expression"], "345 * 892");
        assert_eq!(payload["result"], 307_740);
        assert!(payload["error"].is_null());
    }

    #[tokio::test]
    async fn test_payload_error_shape() {
        let mut arguments = HashMap::new();
        arguments.insert("expression".to_string(), serde_json::json!("1 / 0"));

        let payload = CalculatorTool.execute(&arguments).await.unwrap();
        assert!(payload["result"].is_null());
        assert!(!payload["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_expression_is_invalid_input() {
        let result = CalculatorTool.execute(&HashMap::new()).await;
        assert!(matches!(result, Err(AgentError::InvalidToolInput(_))));
    }
}
