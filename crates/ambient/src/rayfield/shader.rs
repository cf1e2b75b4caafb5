//! RayField fragment shader body. `coord` is `gl_FragCoord`, which already
//! has a top-left origin, matching `rayPos`.

pub(crate) const FRAGMENT_BODY: &str = r"
float staticNoise(vec2 st) {
    return fract(sin(dot(st, vec2(12.9898, 78.233))) * 43758.5453123);
}

float rayStrength(vec2 raySource, vec2 rayRefDirection, vec2 coord,
                  float seedA, float seedB, float speed) {
    vec2 sourceToCoord = coord - raySource;
    vec2 dirNorm = normalize(sourceToCoord);
    float cosAngle = dot(dirNorm, rayRefDirection);
    float dist = length(sourceToCoord);

    float distortedAngle = cosAngle + distortion * sin(iTime * 2.0 + dist * 0.01) * 0.2;

    float spread = max(lightSpread, 0.001);
    float spreadFactor = pow(max(distortedAngle, 0.0), 1.0 / spread);

    float maxDistance = iResolution.x * rayLength;
    float lengthFalloff = clamp((maxDistance - dist) / maxDistance, 0.0, 1.0);

    float fadeReach = iResolution.x * fadeDistance;
    float fadeFalloff = clamp((fadeReach - dist) / fadeReach, 0.5, 1.0);
    float pulse = pulsating > 0.5 ? (0.8 + 0.2 * sin(iTime * speed * 3.0)) : 1.0;

    float baseStrength = clamp(
        (0.45 + 0.15 * sin(distortedAngle * seedA + iTime * speed)) +
        (0.3 + 0.2 * cos(-distortedAngle * seedB + iTime * speed)),
        0.0, 1.0);

    return baseStrength * lengthFalloff * fadeFalloff * spreadFactor * pulse;
}

void main() {
    vec2 coord = gl_FragCoord.xy;

    float rays1 = rayStrength(rayPos, rayDir, coord, 36.2214, 21.11349, 1.5 * raysSpeed);
    float rays2 = rayStrength(rayPos, rayDir, coord, 22.3991, 18.0234, 1.1 * raysSpeed);
    float strength = rays1 * 0.5 + rays2 * 0.4;

    vec3 color = vec3(strength);
    if (noiseAmount > 0.0) {
        float n = staticNoise(coord * 0.01 + iTime * 0.1);
        color *= 1.0 - noiseAmount + noiseAmount * n;
    }

    float brightness = 1.0 - coord.y / iResolution.y;
    color *= vec3(0.1 + brightness * 0.8, 0.3 + brightness * 0.6, 0.5 + brightness * 0.5);

    if (saturation != 1.0) {
        float gray = dot(color, vec3(0.299, 0.587, 0.114));
        color = mix(vec3(gray), color, saturation);
    }

    color *= raysColor;
    outColor = vec4(color * strength, strength);
}
";
