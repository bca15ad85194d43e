/// Catalog of simulated risk factors a scan can report
pub const RISK_FACTORS: [&str; 10] = [
    "Excessive permissions requested",
    "Obfuscated code detected",
    "Network communication to suspicious domains",
    "Potential data harvesting behavior",
    "Anti-debugging techniques found",
    "Dynamic code loading detected",
    "Root detection bypass attempts",
    "Cryptocurrency mining components",
    "Ad fraud mechanisms",
    "SMS premium service abuse",
];
