//! End-to-end synthesis scenarios

use logsub_core::{DeploymentStateOracle, LogGroupError, ReferenceError, SynthesisError};
use logsub_template::Template;
use logsub_test_utils::{engine, service, GraphBuilder, ScriptedStackQuery, SHIPPER_ARN};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn single_function_end_to_end() {
    let mut template = Template::from_value(json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Resources": {
            "ALogGroup": {
                "Type": "AWS::Logs::LogGroup",
                "Properties": { "LogGroupName": "/aws/lambda/a" }
            }
        }
    }))
    .unwrap();

    let yaml = format!(
        r#"
service: orders
functions:
  a: {{}}
custom:
  logSubscription:
    enabled: true
    destinationArn: {SHIPPER_ARN}
    filterPattern: "{{ $.level = 1 }}"
"#
    );

    let query = ScriptedStackQuery::deployed();
    let report = engine(query.clone())
        .synthesize_template(&mut template, &service(&yaml))
        .await
        .unwrap();

    assert_eq!(report.resources_added, 2);
    assert_eq!(query.calls(), 0);
    assert_eq!(
        template.to_value().unwrap(),
        json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": {
                "ALogGroup": {
                    "Type": "AWS::Logs::LogGroup",
                    "Properties": { "LogGroupName": "/aws/lambda/a" }
                },
                "ALogLambdaPermission": {
                    "Type": "AWS::Lambda::Permission",
                    "Properties": {
                        "Action": "lambda:InvokeFunction",
                        "FunctionName": SHIPPER_ARN,
                        "Principal": "logs.us-east-1.amazonaws.com",
                        "SourceArn": { "Fn::GetAtt": ["ALogGroup", "Arn"] }
                    }
                },
                "ASubscriptionFilter": {
                    "Type": "AWS::Logs::SubscriptionFilter",
                    "Properties": {
                        "DestinationArn": SHIPPER_ARN,
                        "FilterPattern": "{ $.level = 1 }",
                        "LogGroupName": "/aws/lambda/a"
                    },
                    "DependsOn": ["ALogLambdaPermission", "ALogGroup"]
                }
            }
        })
    );
}

#[tokio::test]
async fn disabled_layer_emits_nothing() {
    let yaml = format!(
        r"
service: orders
functions:
  a: {{}}
  b: {{}}
custom:
  logSubscription:
    destinationArn: {SHIPPER_ARN}
"
    );
    let mut graph = GraphBuilder::new().function("A", "a").function("B", "b").build();
    let before = graph.clone();

    let report = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert!(report.functions.is_empty());
    assert_eq!(graph, before);
}

#[tokio::test]
async fn unit_override_wins() {
    let yaml = format!(
        r"
service: orders
functions:
  a:
    logSubscription: true
  b: {{}}
  c:
    logSubscription:
      enabled: true
      filterPattern: ERROR
custom:
  logSubscription:
    enabled: false
    destinationArn: {SHIPPER_ARN}
"
    );
    let mut graph = GraphBuilder::new()
        .function("A", "a")
        .function("B", "b")
        .function("C", "c")
        .build();

    engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert!(graph.contains("ASubscriptionFilter"));
    assert!(!graph.contains("BSubscriptionFilter"));
    assert_eq!(
        graph.get("CSubscriptionFilter").unwrap().property("FilterPattern"),
        Some(&json!("ERROR"))
    );
}

#[tokio::test]
async fn disabled_override_beats_enabled_layer() {
    let yaml = format!(
        r"
service: orders
functions:
  a:
    logSubscription: false
custom:
  logSubscription:
    enabled: true
    destinationArn: {SHIPPER_ARN}
"
    );
    let mut graph = GraphBuilder::new().function("A", "a").build();
    let report = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();
    assert_eq!(report.resources_added, 0);
}

#[tokio::test]
async fn sequence_layers_emit_independent_subgraphs() {
    let yaml = r"
service: orders
functions:
  a: {}
custom:
  logSubscription:
    - enabled: true
      destinationArn: arn:aws:lambda:us-east-1:123456789012:function:ship
    - enabled: true
      destinationArn: arn:aws:lambda:us-east-1:123456789012:function:audit
      filterPattern: ERROR
    - enabled: true
      destinationArn: arn:aws:kinesis:us-east-1:123456789012:stream/archive
      roleArn: arn:aws:iam::123456789012:role/deliver
";
    let mut graph = GraphBuilder::new().function("A", "a").build();
    let report = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(yaml))
        .await
        .unwrap();

    assert_eq!(report.layers, 3);
    assert_eq!(report.functions.len(), 3);
    for index in 0..3 {
        let filter = graph.get(&format!("ASubscriptionFilter{index}")).unwrap();
        assert_eq!(filter.depends_on.last().map(String::as_str), Some("ALogGroup"));
    }
    assert!(graph.contains("ALogLambdaPermission0"));
    assert!(graph.contains("ALogLambdaPermission1"));
    assert!(!graph.contains("ALogLambdaPermission2"));
    assert!(!graph.contains("ASubscriptionFilter"));
    assert_eq!(
        graph.get("ASubscriptionFilter2").unwrap().property("RoleArn"),
        Some(&json!("arn:aws:iam::123456789012:role/deliver"))
    );
    assert_eq!(report.resources_added, 5);
}

#[tokio::test]
async fn get_att_destination_dependency_order() {
    let yaml = r"
service: orders
functions:
  a: {}
custom:
  logSubscription:
    enabled: true
    destinationArn:
      Fn::GetAtt: [ShipperLambdaFunction, Arn]
";
    let mut graph = GraphBuilder::new()
        .function("A", "a")
        .lambda("ShipperLambdaFunction")
        .build();

    engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(yaml))
        .await
        .unwrap();

    let filter = graph.get("ASubscriptionFilter").unwrap();
    assert_eq!(
        filter.depends_on,
        vec!["ShipperLambdaFunction", "ALogLambdaPermission", "ALogGroup"]
    );
    assert_eq!(
        filter.property("DestinationArn"),
        Some(&json!({ "Fn::GetAtt": ["ShipperLambdaFunction", "Arn"] }))
    );
    assert_eq!(filter.property("RoleArn"), None);
}

#[tokio::test]
async fn synthesis_is_deterministic() {
    let yaml = r"
service: orders
provider:
  logs:
    restApi: true
functions:
  a: {}
  b: {}
custom:
  logSubscription:
    - enabled: true
      destinationArn: arn:aws:lambda:us-east-1:123456789012:function:ship
      apiGatewayLogs: true
    - enabled: true
      destinationArn:
        Ref: ArchiveStream
";
    let start = GraphBuilder::new()
        .function("A", "a")
        .function("B", "b")
        .resource("ArchiveStream", "AWS::Kinesis::Stream")
        .rest_api()
        .build();
    let service = service(yaml);

    let mut first = start.clone();
    let mut second = start.clone();
    engine(ScriptedStackQuery::not_deployed())
        .synthesize(&mut first, &service)
        .await
        .unwrap();
    engine(ScriptedStackQuery::not_deployed())
        .synthesize(&mut second, &service)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn gateway_first_deploy() {
    let yaml = format!(
        r"
service: orders
provider:
  logs:
    restApi: true
custom:
  logSubscription:
    destinationArn: {SHIPPER_ARN}
    apiGatewayLogs: true
"
    );
    let mut graph = GraphBuilder::new().rest_api().build();
    let query = ScriptedStackQuery::not_deployed();
    let report = engine(query.clone())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert_eq!(query.calls(), 1);
    assert_eq!(report.deployed, Some(false));
    assert_eq!(
        serde_json::to_value(&graph).unwrap(),
        json!({
            "ApiGatewayRestApi": { "Type": "AWS::ApiGateway::RestApi" },
            "ApiGatewayLogGroup": {
                "Type": "AWS::Logs::LogGroup",
                "Properties": { "LogGroupName": "/aws/api-gateway/orders-dev" }
            },
            "ApiGatewayExecutionLogGroup": {
                "Type": "AWS::Logs::LogGroup",
                "DeletionPolicy": "Retain",
                "Properties": {
                    "LogGroupName": { "Fn::Sub": "API-Gateway-Execution-Logs_${ApiGatewayRestApi}/dev" }
                }
            },
            "ApiGatewayLogGroupLambdaPermission": {
                "Type": "AWS::Lambda::Permission",
                "Properties": {
                    "Action": "lambda:InvokeFunction",
                    "FunctionName": SHIPPER_ARN,
                    "Principal": "logs.us-east-1.amazonaws.com",
                    "SourceArn": { "Fn::GetAtt": ["ApiGatewayLogGroup", "Arn"] }
                }
            },
            "ApiGatewayExecutionLogGroupLambdaPermission": {
                "Type": "AWS::Lambda::Permission",
                "Properties": {
                    "Action": "lambda:InvokeFunction",
                    "FunctionName": SHIPPER_ARN,
                    "Principal": "logs.us-east-1.amazonaws.com",
                    "SourceArn": {
                        "Fn::Sub": "arn:${AWS::Partition}:logs:${AWS::Region}:${AWS::AccountId}:log-group:API-Gateway-Execution-Logs_${ApiGatewayRestApi}/dev:*"
                    }
                }
            },
            "ApiGatewayAccessLogGroupSubscriptionFilter": {
                "Type": "AWS::Logs::SubscriptionFilter",
                "Properties": {
                    "DestinationArn": SHIPPER_ARN,
                    "FilterPattern": "",
                    "LogGroupName": { "Ref": "ApiGatewayLogGroup" }
                },
                "DependsOn": ["ApiGatewayLogGroupLambdaPermission"]
            },
            "ApiGatewayExecutionLogGroupSubscriptionFilter": {
                "Type": "AWS::Logs::SubscriptionFilter",
                "Properties": {
                    "DestinationArn": SHIPPER_ARN,
                    "FilterPattern": "",
                    "LogGroupName": { "Fn::Sub": "API-Gateway-Execution-Logs_${ApiGatewayRestApi}/dev" }
                },
                "DependsOn": [
                    "ApiGatewayExecutionLogGroupLambdaPermission",
                    "ApiGatewayExecutionLogGroup",
                    "ApiGatewayDeployment1234"
                ]
            }
        })
    );
}

#[tokio::test]
async fn gateway_redeploy_with_execution_logging_only() {
    let yaml = format!(
        r"
service: orders
provider:
  logs:
    restApi:
      accessLogging: false
custom:
  logSubscription:
    destinationArn: {SHIPPER_ARN}
    apiGatewayLogs: true
"
    );
    let mut graph = GraphBuilder::new().rest_api().build();
    let report = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert_eq!(report.deployed, Some(true));
    assert!(!graph.contains("ApiGatewayExecutionLogGroup"));
    assert!(!graph.contains("ApiGatewayAccessLogGroupSubscriptionFilter"));
    assert!(!graph.contains("ApiGatewayLogGroupLambdaPermission"));
    assert!(graph.contains("ApiGatewayExecutionLogGroupSubscriptionFilter"));
}

#[tokio::test]
async fn gateway_skipped_without_rest_api() {
    let yaml = format!(
        r"
service: orders
provider:
  logs:
    restApi: true
custom:
  logSubscription:
    destinationArn: {SHIPPER_ARN}
    apiGatewayLogs: true
"
    );
    let mut graph = GraphBuilder::new().build();
    let query = ScriptedStackQuery::deployed();
    let report = engine(query.clone())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert_eq!(query.calls(), 0);
    assert_eq!(report.resources_added, 0);
}

#[tokio::test]
async fn oracle_consulted_once_per_pass() {
    let yaml = format!(
        r"
service: orders
provider:
  logs:
    restApi: true
custom:
  logSubscription:
    - destinationArn: {SHIPPER_ARN}
      apiGatewayLogs: true
    - destinationArn: {SHIPPER_ARN}
      apiGatewayLogs: true
"
    );
    let mut graph = GraphBuilder::new().rest_api().build();
    let query = ScriptedStackQuery::not_deployed();
    engine(query.clone())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap();

    assert_eq!(query.calls(), 1);
    assert!(graph.contains("ApiGatewayExecutionLogGroup"));
    assert!(graph.contains("ApiGatewayExecutionLogGroupSubscriptionFilter0"));
    assert!(graph.contains("ApiGatewayExecutionLogGroupSubscriptionFilter1"));
}

#[tokio::test]
async fn is_deployed_table() {
    let cases = [
        (ScriptedStackQuery::not_deployed(), Ok(false)),
        (ScriptedStackQuery::deployed(), Ok(true)),
        (ScriptedStackQuery::empty(), Ok(false)),
        (ScriptedStackQuery::failing("access denied"), Err("access denied")),
    ];

    for (query, expected) in cases {
        let oracle = DeploymentStateOracle::new(query.clone());
        let result = oracle.is_deployed("orders-dev").await;
        match expected {
            Ok(deployed) => assert_eq!(result.unwrap(), deployed),
            Err(message) => assert_eq!(result.unwrap_err().to_string(), message),
        }
        assert_eq!(query.calls(), 1);
    }
}

#[tokio::test]
async fn validation_failure_aborts_pass() {
    let yaml = format!(
        r"
service: orders
functions:
  a: {{}}
  b: {{}}
custom:
  logSubscription:
    enabled: true
    destinationArn: {SHIPPER_ARN}
"
    );
    let mut graph = GraphBuilder::new()
        .function("A", "a")
        .resource("BLogGroup", "SomethingWrong")
        .build();

    let err = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(
        err,
        SynthesisError::LogGroup(LogGroupError::WrongType { ref found, .. }) if found == "SomethingWrong"
    ));
    assert_eq!(
        err.to_string(),
        "Expected BLogGroup to have a Type of AWS::Logs::LogGroup but got SomethingWrong"
    );
}

#[tokio::test]
async fn dangling_destination_reference_is_an_error() {
    let yaml = r"
service: orders
functions:
  a: {}
custom:
  logSubscription:
    enabled: true
    destinationArn:
      Fn::GetAtt: [Missing, Arn]
";
    let mut graph = GraphBuilder::new().function("A", "a").build();
    let err = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(yaml))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SynthesisError::Reference(ReferenceError::UnresolvedReference { ref logical_id }) if logical_id == "Missing"
    ));
}

#[tokio::test]
async fn retired_flag_aborts_pass() {
    let yaml = format!(
        r"
service: orders
functions:
  a: {{}}
custom:
  logSubscription:
    enabled: true
    destinationArn: {SHIPPER_ARN}
    addSourceLambdaPermission: true
"
    );
    let mut graph = GraphBuilder::new().function("A", "a").build();
    let err = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "addSourceLambdaPermission is no longer supported, see README"
    );
}

#[tokio::test]
async fn existing_resources_are_never_overwritten() {
    let yaml = format!(
        r"
service: orders
functions:
  a: {{}}
custom:
  logSubscription:
    enabled: true
    destinationArn: {SHIPPER_ARN}
"
    );
    let mut graph = GraphBuilder::new()
        .function("A", "a")
        .resource("ASubscriptionFilter", "Custom::Mine")
        .build();

    let err = engine(ScriptedStackQuery::deployed())
        .synthesize(&mut graph, &service(&yaml))
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Template(_)));
    assert_eq!(
        graph.resource_type("ASubscriptionFilter"),
        Some("Custom::Mine")
    );
}
